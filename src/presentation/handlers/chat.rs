use std::convert::Infallible;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::stream;
use serde::Serialize;

use crate::domain::{CodeReview, SearchProfile};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::ApiError;
use super::openai_types::{ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse};

pub const CODE_REVIEWER_MODEL: &str = "code-reviewer";
pub const CINE_SHAZAM_MODEL: &str = "cine-shazam";
pub const CINE_SHAZAM_COMPACT_MODEL: &str = "cine-shazam-compact";
pub const SUPPORT_AGENT_MODEL: &str = "support-agent";

pub const DEMO_MODELS: [&str; 4] = [
    CODE_REVIEWER_MODEL,
    CINE_SHAZAM_MODEL,
    CINE_SHAZAM_COMPACT_MODEL,
    SUPPORT_AGENT_MODEL,
];

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ChatError,
}

#[derive(Serialize)]
pub struct ChatError {
    pub message: String,
    pub r#type: String,
}

fn invalid_request(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: ChatError {
                message,
                r#type: "invalid_request_error".to_string(),
            },
        }),
    )
        .into_response()
}

/// Renders a review the way the reviewer prompt asks the model to answer.
pub fn format_review(review: &CodeReview) -> String {
    format!(
        "### 1. Bug Report\n{}\n\n### 2. Fixed Code\n```python\n{}\n```",
        review.bug_report,
        review.fixed_code.trim_end()
    )
}

/// OpenAI-compatible entry point; `model` selects the demo that answers.
#[tracing::instrument(
    skip(state, request),
    fields(model = %request.model, streaming = ?request.stream)
)]
pub async fn chat_completions_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatCompletionRequest>,
) -> Response {
    let Some(user_message) = request.last_user_message().map(str::to_string) else {
        tracing::warn!("Chat completion request without a user message");
        return invalid_request(
            StatusCode::BAD_REQUEST,
            "No user message provided".to_string(),
        );
    };

    tracing::debug!(prompt = %sanitize_prompt(&user_message), "Processing chat completion");

    let answer = match request.model.as_str() {
        CODE_REVIEWER_MODEL => state
            .code_review_service
            .review(&user_message)
            .await
            .map(|review| format_review(&review))
            .map_err(ApiError::from),
        CINE_SHAZAM_MODEL | CINE_SHAZAM_COMPACT_MODEL => {
            let profile = if request.model == CINE_SHAZAM_COMPACT_MODEL {
                SearchProfile::Compact
            } else {
                SearchProfile::Detailed
            };
            state
                .subtitle_search_service
                .search(&user_message, profile)
                .await
                .map(|answer| answer.answer)
                .map_err(ApiError::from)
        }
        SUPPORT_AGENT_MODEL => state
            .support_chat_service
            .answer_once(&user_message)
            .await
            .map_err(ApiError::from),
        other => {
            tracing::warn!(model = other, "Unknown model requested");
            return invalid_request(
                StatusCode::NOT_FOUND,
                format!(
                    "The model '{}' does not exist. Available: {}",
                    other,
                    DEMO_MODELS.join(", ")
                ),
            );
        }
    };

    let content = match answer {
        Ok(content) => content,
        Err(e) => return e.into_response(),
    };

    tracing::info!(chars = content.len(), "Chat completion answered");

    if request.is_streaming() {
        stream_completion(&request.model, &content)
    } else {
        let response = ChatCompletionResponse::new(request.model, &user_message, content);
        (StatusCode::OK, Json(response)).into_response()
    }
}

fn sse_data<T: Serialize>(chunk: &T) -> String {
    format!("data: {}\n\n", serde_json::to_string(chunk).unwrap_or_default())
}

/// Replays a finished answer as OpenAI SSE chunks, one word per chunk.
fn stream_completion(model: &str, content: &str) -> Response {
    let id = format!("chatcmpl-{}", uuid::Uuid::new_v4());

    let mut events = vec![sse_data(&ChatCompletionChunk::new_start(&id, model))];
    events.extend(content.split_inclusive(char::is_whitespace).map(|piece| {
        sse_data(&ChatCompletionChunk::new_content(&id, model, piece))
    }));
    events.push(sse_data(&ChatCompletionChunk::new_done(&id, model)));
    events.push("data: [DONE]\n\n".to_string());

    let body = Body::from_stream(stream::iter(events.into_iter().map(Ok::<_, Infallible>)));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        body,
    )
        .into_response()
}
