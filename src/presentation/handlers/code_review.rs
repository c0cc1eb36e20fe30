use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Deserialize)]
pub struct CodeReviewRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Serialize)]
pub struct CodeReviewResponse {
    pub bug_report: String,
    pub fixed_code: String,
    pub is_perfect: bool,
}

#[tracing::instrument(skip(state, request))]
pub async fn code_review_handler(
    State(state): State<AppState>,
    Json(request): Json<CodeReviewRequest>,
) -> Result<Json<CodeReviewResponse>, ApiError> {
    tracing::debug!(code = %sanitize_prompt(&request.code), "Reviewing code");

    let review = state.code_review_service.review(&request.code).await?;
    let is_perfect = review.is_perfect();

    Ok(Json(CodeReviewResponse {
        bug_report: review.bug_report,
        fixed_code: review.fixed_code,
        is_perfect,
    }))
}
