use std::sync::Arc;

use crate::application::services::{
    CodeReviewService, SpamService, SubtitleIngestionService, SubtitleSearchService,
    SupportChatService,
};
use crate::presentation::config::RecordingSettings;

/// Services shared by every demo endpoint.
#[derive(Clone)]
pub struct AppState {
    pub spam_service: Arc<SpamService>,
    pub code_review_service: Arc<CodeReviewService>,
    pub subtitle_search_service: Arc<SubtitleSearchService>,
    pub subtitle_ingestion_service: Arc<SubtitleIngestionService>,
    pub support_chat_service: Arc<SupportChatService>,
    pub recording: RecordingSettings,
}
