pub mod chat;
pub mod gemini;
pub mod prompt;
pub mod provider;
