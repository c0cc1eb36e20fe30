use std::sync::Arc;

use crate::application::ports::{ChatMessage, LlmClient, LlmClientError};
use crate::domain::CodeReview;

use super::input::{CODE_EMPTY_WARNING, InputError, require_text};

pub const CODE_REVIEWER_SYSTEM_PROMPT: &str = r#"You are a Python Code Reviewer.
The user will provide Python code. Your response must always have exactly two parts:
1. Bug Report:
- If the code has issues, list them as short, clear bullet points.
- If the code is correct, return "The code is perfect".

2. Fixed Code:
Provide the corrected version of the code (or the original code if no changes are needed).

Important Notes:
- Always make sure the code is related to python and act as python reviewer only VERY STRICTLY.
- Keep the bug report concise and structured.
- Output must always follow the required two-part format, with no extra commentary."#;

pub struct CodeReviewService {
    llm_client: Arc<dyn LlmClient>,
}

impl CodeReviewService {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    #[tracing::instrument(skip(self, code))]
    pub async fn review(&self, code: &str) -> Result<CodeReview, CodeReviewError> {
        require_text(code, CODE_EMPTY_WARNING)?;

        let messages = [
            ChatMessage::system(CODE_REVIEWER_SYSTEM_PROMPT),
            ChatMessage::user(code),
        ];
        let raw = self
            .llm_client
            .complete(&messages)
            .await
            .map_err(CodeReviewError::Completion)?;

        if raw.trim().is_empty() {
            return Err(CodeReviewError::EmptyResponse);
        }

        let review = CodeReview::parse(&raw, code);
        tracing::info!(perfect = review.is_perfect(), "Code review completed");
        Ok(review)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodeReviewError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("completion: {0}")]
    Completion(LlmClientError),
    #[error("reviewer returned an empty response")]
    EmptyResponse,
}
