use async_trait::async_trait;

use super::{BillingGatewayError, ChatMessage, LlmClientError};
use crate::domain::SupportRoute;

/// State threaded through an agent graph invocation.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    pub messages: Vec<ChatMessage>,
    pub route: Option<SupportRoute>,
}

impl AgentState {
    pub fn from_user_message(content: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(content)],
            route: None,
        }
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[async_trait]
pub trait AgentGraph: Send + Sync {
    /// Runs the graph to completion; the reply is the last message of the returned state.
    async fn invoke(&self, state: AgentState) -> Result<AgentState, AgentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("routing failed: {0}")]
    Routing(LlmClientError),
    #[error("billing lookup failed: {0}")]
    Billing(#[from] BillingGatewayError),
    #[error("agent completion failed: {0}")]
    Completion(LlmClientError),
    #[error("empty agent state")]
    EmptyState,
}

impl AgentError {
    pub fn is_billing_connection_failure(&self) -> bool {
        matches!(self, AgentError::Billing(BillingGatewayError::ConnectionFailed(_)))
    }
}
