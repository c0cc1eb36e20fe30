use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{SubtitleLoaderError, TranscriptionError};
use crate::application::services::{
    CodeReviewError, IngestionError, InputError, SearchError, SpamError, SupportChatError,
};

#[derive(Serialize)]
pub struct WarningResponse {
    pub warning: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure of a demo endpoint, rendered as `{"warning"}` or `{"error"}`.
#[derive(Debug)]
pub enum ApiError {
    /// Rejected user input; no model was invoked.
    Warning(&'static str),
    BadRequest(String),
    UnsupportedMedia(String),
    NotFound(String),
    /// A hosted model or backing service failed.
    Upstream(String),
    Internal(String),
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        ApiError::Warning(e.warning())
    }
}

impl From<SpamError> for ApiError {
    fn from(e: SpamError) -> Self {
        match e {
            SpamError::Input(input) => input.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CodeReviewError> for ApiError {
    fn from(e: CodeReviewError) -> Self {
        match e {
            CodeReviewError::Input(input) => input.into(),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Input(input) => input.into(),
            SearchError::Transcription(TranscriptionError::UnsupportedFormat(reason)) => {
                ApiError::UnsupportedMedia(reason)
            }
            SearchError::Embedding(err) => ApiError::Internal(format!("embedding: {}", err)),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<IngestionError> for ApiError {
    fn from(e: IngestionError) -> Self {
        match e {
            IngestionError::Loading(SubtitleLoaderError::InvalidEncoding(reason)) => {
                ApiError::UnsupportedMedia(format!("subtitle file is not valid utf-8: {}", reason))
            }
            IngestionError::Loading(err) => ApiError::BadRequest(err.to_string()),
            IngestionError::Storage(err) => ApiError::Upstream(format!("storage: {}", err)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<SupportChatError> for ApiError {
    fn from(e: SupportChatError) -> Self {
        match e {
            SupportChatError::Input(input) => input.into(),
            SupportChatError::SessionNotFound(id) => {
                ApiError::NotFound(format!("session {} not found", id))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Warning(warning) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(WarningResponse {
                        warning: warning.to_string(),
                    }),
                )
                    .into_response();
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UnsupportedMedia(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %message, "Request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
