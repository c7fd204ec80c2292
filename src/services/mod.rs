pub mod ticket_extraction;

pub use ticket_extraction::TicketExtractionService;
