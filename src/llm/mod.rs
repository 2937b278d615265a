pub mod client;
pub mod error;
pub mod openrouter;

pub use client::{ChatBackend, Message};
pub use error::ChatError;
pub use openrouter::OpenRouterClient;
