use super::{ConversationId, Message};
use chrono::{DateTime, Utc};

/// A support chat session and its transcript.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: ConversationId,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(id: ConversationId) -> Self {
        Self {
            id,
            ..Self::new()
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
