mod billing_record;
mod chunk;
mod code_review;
mod conversation;
mod conversation_id;
mod embedding;
mod message;
mod message_role;
mod search_profile;
mod spam_label;
mod support_route;

pub use billing_record::BillingRecord;
pub use chunk::{Chunk, ChunkId, DocumentId};
pub use code_review::{CodeReview, PERFECT_CODE_VERDICT};
pub use conversation::Conversation;
pub use conversation_id::ConversationId;
pub use embedding::Embedding;
pub use message::{Message, MessageId};
pub use message_role::MessageRole;
pub use search_profile::SearchProfile;
pub use spam_label::SpamLabel;
pub use support_route::SupportRoute;
