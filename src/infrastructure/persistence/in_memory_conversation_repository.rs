use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{ConversationRepository, RepositoryError};
use crate::domain::{Conversation, ConversationId, Message};

/// Process-local session store; sessions are lost on restart.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: RwLock<HashMap<ConversationId, Conversation>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), RepositoryError> {
        let mut conversations = self.conversations.write().await;
        if conversations.contains_key(&conversation.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "conversation {} already exists",
                conversation.id
            )));
        }
        conversations.insert(conversation.id, conversation.clone());
        tracing::debug!(conversation_id = %conversation.id, "Conversation created");
        Ok(())
    }

    async fn get_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self.conversations.read().await.get(&id).cloned())
    }

    async fn append_message(&self, message: &Message) -> Result<(), RepositoryError> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(&message.conversation_id)
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("conversation {}", message.conversation_id))
            })?;
        conversation.messages.push(message.clone());
        conversation.updated_at = Utc::now();
        Ok(())
    }

    async fn get_messages(
        &self,
        conversation_id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let conversations = self.conversations.read().await;
        let conversation = conversations.get(&conversation_id).ok_or_else(|| {
            RepositoryError::NotFound(format!("conversation {}", conversation_id))
        })?;
        let skip = conversation.messages.len().saturating_sub(limit);
        Ok(conversation.messages[skip..].to_vec())
    }
}
