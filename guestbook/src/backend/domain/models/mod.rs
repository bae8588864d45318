pub mod message;

pub use message::{validate_message_text, MessageValidationError};
