pub const SPAM_EMPTY_WARNING: &str = "Please enter the email content to classify.";
pub const CODE_EMPTY_WARNING: &str = "Please enter some Python code to review.";
pub const SEARCH_EMPTY_WARNING: &str = "Please provide some dialogue to search for.";
pub const SUPPORT_EMPTY_WARNING: &str = "Please type a question for the support assistant.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{warning}")]
    Empty { warning: &'static str },
}

impl InputError {
    pub fn warning(&self) -> &'static str {
        match self {
            InputError::Empty { warning } => warning,
        }
    }
}

/// Rejects empty or whitespace-only input before any model is invoked.
pub fn require_text<'a>(input: &'a str, warning: &'static str) -> Result<&'a str, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        tracing::warn!(warning, "Rejected empty input");
        return Err(InputError::Empty { warning });
    }
    Ok(trimmed)
}
