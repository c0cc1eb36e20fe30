use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::services::BillingService;
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    billing_handler, chat_completions_handler, classify_spam_handler, code_review_handler,
    health_handler, ingest_subtitles_handler, models_handler, record_handler,
    search_audio_handler, search_subtitles_handler, session_history_handler,
    support_chat_handler,
};
use crate::presentation::state::AppState;

const UPLOAD_LIMIT_BYTES: usize = 25 * 1024 * 1024;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

pub fn create_router(state: AppState) -> Router {
    let uploads = Router::new()
        .route("/api/v1/subtitles/search/audio", post(search_audio_handler))
        .route("/api/v1/subtitles/ingest", post(ingest_subtitles_handler))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/spam/classify", post(classify_spam_handler))
        .route("/api/v1/code-review", post(code_review_handler))
        .route("/api/v1/subtitles/search", post(search_subtitles_handler))
        .route("/api/v1/subtitles/record", post(record_handler))
        .route("/api/v1/support/chat", post(support_chat_handler))
        .route(
            "/api/v1/support/sessions/{session_id}",
            get(session_history_handler),
        )
        .route("/v1/models", get(models_handler))
        .route("/api/models", get(models_handler))
        .route("/v1/chat/completions", post(chat_completions_handler))
        .route("/api/chat/completions", post(chat_completions_handler))
        .merge(uploads)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer())
        .layer(cors_layer())
        .with_state(state)
}

/// Router of the standalone billing mock.
pub fn create_billing_router(service: Arc<BillingService>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/billing", get(billing_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer())
        .with_state(service)
}
