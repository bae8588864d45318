/// Checks applied to message text before it reaches storage
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MessageValidationError {
    #[error("Message text cannot be empty")]
    EmptyText,
}

/// Validate visitor input; the text itself is stored exactly as typed
pub fn validate_message_text(text: &str) -> Result<(), MessageValidationError> {
    if text.trim().is_empty() {
        return Err(MessageValidationError::EmptyText);
    }
    Ok(())
}
