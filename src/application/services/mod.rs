mod billing_service;
mod code_review_service;
mod input;
mod spam_service;
mod subtitle_ingestion_service;
mod subtitle_search_service;
mod support_chat_service;
mod support_graph;
mod token_counter;

pub use billing_service::{BILLING_NOT_FOUND_DETAIL, BillingService};
pub use code_review_service::{CODE_REVIEWER_SYSTEM_PROMPT, CodeReviewError, CodeReviewService};
pub use input::{
    CODE_EMPTY_WARNING, InputError, SEARCH_EMPTY_WARNING, SPAM_EMPTY_WARNING,
    SUPPORT_EMPTY_WARNING, require_text,
};
pub use spam_service::{SpamError, SpamService, SpamVerdict};
pub use subtitle_ingestion_service::{IngestionError, IngestionReport, SubtitleIngestionService};
pub use subtitle_search_service::{
    AudioSearchAnswer, MatchedSubtitle, NO_MATCH_ANSWER, SearchAnswer, SearchError,
    SubtitleSearchService,
};
pub use support_chat_service::{
    BILLING_UNAVAILABLE_REPLY, GREETING, SupportChatError, SupportChatService, SupportReply,
};
pub use support_graph::{ASK_FOR_USER_ID, SupportGraph, extract_user_id};
pub use token_counter::{count_tokens, take_within_budget};
