use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::domain::SpamLabel;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize)]
pub struct ClassifyResponse {
    pub label: &'static str,
    pub is_spam: bool,
    pub spam_probability: f32,
    pub message: &'static str,
}

#[tracing::instrument(skip(state, request))]
pub async fn classify_spam_handler(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    tracing::debug!(email = %sanitize_prompt(&request.text), "Classifying email");

    let verdict = state.spam_service.classify(&request.text).await?;

    Ok(Json(ClassifyResponse {
        label: verdict.label.as_str(),
        is_spam: verdict.label == SpamLabel::Spam,
        spam_probability: verdict.spam_probability,
        message: verdict.message,
    }))
}
