mod billing;
mod chat;
mod code_review;
pub mod error;
mod health;
mod models;
pub mod openai_types;
mod spam;
mod subtitles;
mod support;

pub use billing::billing_handler;
pub use chat::{
    CINE_SHAZAM_COMPACT_MODEL, CINE_SHAZAM_MODEL, CODE_REVIEWER_MODEL, DEMO_MODELS,
    SUPPORT_AGENT_MODEL, chat_completions_handler, format_review,
};
pub use code_review::code_review_handler;
pub use health::health_handler;
pub use models::models_handler;
pub use spam::classify_spam_handler;
pub use subtitles::{
    ingest_subtitles_handler, record_handler, search_audio_handler, search_subtitles_handler,
};
pub use support::{session_history_handler, support_chat_handler};
