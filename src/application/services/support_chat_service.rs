use std::sync::Arc;

use crate::application::ports::{
    AgentError, AgentGraph, AgentState, ConversationRepository, RepositoryError,
};
use crate::domain::{Conversation, ConversationId, Message, MessageRole, SupportRoute};

use super::input::{InputError, SUPPORT_EMPTY_WARNING, require_text};

pub const GREETING: &str =
    "Hello! I'm your automated support assistant. How can I help you today?";

pub const BILLING_UNAVAILABLE_REPLY: &str = "Error: I can't connect to the billing API. \
**Did you remember to start the billing-api service?**";

/// Session-keeping front end of the support agent graph.
pub struct SupportChatService {
    graph: Arc<dyn AgentGraph>,
    repository: Arc<dyn ConversationRepository>,
    history_limit: usize,
}

#[derive(Debug, Clone)]
pub struct SupportReply {
    pub session_id: ConversationId,
    pub reply: String,
    pub route: Option<SupportRoute>,
    /// The reply is an error notice rather than an agent answer.
    pub failed: bool,
}

impl SupportChatService {
    pub fn new(
        graph: Arc<dyn AgentGraph>,
        repository: Arc<dyn ConversationRepository>,
        history_limit: usize,
    ) -> Self {
        Self {
            graph,
            repository,
            history_limit,
        }
    }

    /// Opens a session whose history starts with the assistant greeting.
    pub async fn start_session(&self) -> Result<Conversation, SupportChatError> {
        let conversation = Conversation::new();
        self.repository.create_conversation(&conversation).await?;
        self.repository
            .append_message(&Message::assistant(conversation.id, GREETING))
            .await?;

        tracing::info!(session_id = %conversation.id, "Support session started");
        Ok(conversation)
    }

    #[tracing::instrument(skip(self, text))]
    pub async fn send(
        &self,
        session_id: Option<ConversationId>,
        text: &str,
    ) -> Result<SupportReply, SupportChatError> {
        let text = require_text(text, SUPPORT_EMPTY_WARNING)?;

        let session_id = match session_id {
            Some(id) => {
                self.repository
                    .get_conversation(id)
                    .await?
                    .ok_or(SupportChatError::SessionNotFound(id))?
                    .id
            }
            None => self.start_session().await?.id,
        };

        self.repository
            .append_message(&Message::user(session_id, text))
            .await?;

        let (reply, route, failed) = self.run_turn(text).await;

        self.repository
            .append_message(&Message::assistant(session_id, reply.clone()))
            .await?;

        Ok(SupportReply {
            session_id,
            reply,
            route,
            failed,
        })
    }

    /// Answers a single message without opening or storing a session.
    #[tracing::instrument(skip(self, text))]
    pub async fn answer_once(&self, text: &str) -> Result<String, SupportChatError> {
        let text = require_text(text, SUPPORT_EMPTY_WARNING)?;
        let (reply, _, _) = self.run_turn(text).await;
        Ok(reply)
    }

    pub async fn history(&self, session_id: ConversationId) -> Result<Vec<Message>, SupportChatError> {
        if self.repository.get_conversation(session_id).await?.is_none() {
            return Err(SupportChatError::SessionNotFound(session_id));
        }
        Ok(self
            .repository
            .get_messages(session_id, self.history_limit)
            .await?)
    }

    async fn run_turn(&self, text: &str) -> (String, Option<SupportRoute>, bool) {
        match self.invoke_graph(text).await {
            Ok((reply, route)) => (reply, route, false),
            Err(e) if e.is_billing_connection_failure() => {
                tracing::error!(error = %e, "Billing API unreachable");
                (BILLING_UNAVAILABLE_REPLY.to_string(), None, true)
            }
            Err(e) => {
                tracing::error!(error = %e, "Support agent failed");
                (format!("An error occurred: {}", e), None, true)
            }
        }
    }

    async fn invoke_graph(&self, text: &str) -> Result<(String, Option<SupportRoute>), AgentError> {
        let state = self
            .graph
            .invoke(AgentState::from_user_message(text))
            .await?;

        match state.last_message() {
            Some(message) if message.role == MessageRole::Assistant => {
                Ok((message.content.clone(), state.route))
            }
            _ => Err(AgentError::EmptyState),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SupportChatError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("session not found: {0}")]
    SessionNotFound(ConversationId),
    #[error("session storage: {0}")]
    Repository(#[from] RepositoryError),
}
