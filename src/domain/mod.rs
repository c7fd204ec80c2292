pub mod normalize;
pub mod ticket;
