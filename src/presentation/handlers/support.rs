use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ConversationId;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Deserialize)]
pub struct SupportChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct SupportChatResponse {
    pub session_id: String,
    pub reply: String,
    pub route: Option<&'static str>,
    pub failed: bool,
}

#[derive(Serialize)]
pub struct SessionHistoryResponse {
    pub session_id: String,
    pub messages: Vec<HistoryMessage>,
}

#[derive(Serialize)]
pub struct HistoryMessage {
    pub role: &'static str,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

fn parse_session_id(raw: &str) -> Result<ConversationId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid session id: {}", raw)))
}

#[tracing::instrument(skip(state, request))]
pub async fn support_chat_handler(
    State(state): State<AppState>,
    Json(request): Json<SupportChatRequest>,
) -> Result<Json<SupportChatResponse>, ApiError> {
    tracing::debug!(message = %sanitize_prompt(&request.message), "Support chat message");

    let session_id = request
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_session_id)
        .transpose()?;

    let reply = state
        .support_chat_service
        .send(session_id, &request.message)
        .await?;

    Ok(Json(SupportChatResponse {
        session_id: reply.session_id.to_string(),
        reply: reply.reply,
        route: reply.route.map(|r| r.as_str()),
        failed: reply.failed,
    }))
}

#[tracing::instrument(skip(state))]
pub async fn session_history_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionHistoryResponse>, ApiError> {
    let id = parse_session_id(&session_id)?;
    let messages = state.support_chat_service.history(id).await?;

    Ok(Json(SessionHistoryResponse {
        session_id: id.to_string(),
        messages: messages
            .into_iter()
            .map(|m| HistoryMessage {
                role: m.role.as_str(),
                content: m.content,
                created_at: m.created_at,
            })
            .collect(),
    }))
}
