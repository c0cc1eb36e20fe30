use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use crate::application::ports::{
    AgentError, AgentGraph, AgentState, BillingGateway, ChatMessage, LlmClient,
};
use crate::domain::{MessageRole, SupportRoute};

const ROUTER_PROMPT: &str = "You are the front desk of a customer support team. \
Classify the customer's message as either a billing question (invoices, payments, \
subscription status, account balance) or a technical question (errors, outages, \
timeouts, configuration, anything else). Reply with exactly one word: billing or technical.";

const BILLING_AGENT_PROMPT: &str = "You are a billing support agent. Answer the customer \
using only the billing record below. Be brief and friendly, state the plan status, the \
outstanding invoice and the details, and suggest a next step when a payment is overdue.";

const TECHNICAL_AGENT_PROMPT: &str = "You are a technical support agent. Diagnose the \
customer's problem and give short, numbered troubleshooting steps. If the issue sounds \
like an outage, say so and suggest checking the status page or contacting on-call support.";

pub const ASK_FOR_USER_ID: &str =
    "I can help with billing. Could you share your numeric user ID so I can look up your account?";

static USER_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{4,}\b").unwrap());

/// Routes a support query to a billing or technical agent.
pub struct SupportGraph {
    llm_client: Arc<dyn LlmClient>,
    billing_gateway: Arc<dyn BillingGateway>,
}

impl SupportGraph {
    pub fn new(llm_client: Arc<dyn LlmClient>, billing_gateway: Arc<dyn BillingGateway>) -> Self {
        Self {
            llm_client,
            billing_gateway,
        }
    }

    async fn route(&self, query: &str) -> Result<SupportRoute, AgentError> {
        let verdict = self
            .llm_client
            .complete(&[ChatMessage::system(ROUTER_PROMPT), ChatMessage::user(query)])
            .await
            .map_err(AgentError::Routing)?;

        let route = SupportRoute::from_verdict(&verdict);
        tracing::info!(route = %route, verdict = %verdict.trim(), "Support query routed");
        Ok(route)
    }

    async fn billing_agent(&self, query: &str) -> Result<String, AgentError> {
        let Some(user_id) = extract_user_id(query) else {
            tracing::debug!("No user id in billing query");
            return Ok(ASK_FOR_USER_ID.to_string());
        };

        let Some(record) = self.billing_gateway.lookup(user_id).await? else {
            return Ok(format!(
                "I couldn't find user ID {} in our billing system. Please double-check the number and try again.",
                user_id
            ));
        };

        let record_context = format!(
            "Billing record:\n- user_id: {}\n- status: {}\n- invoice: {}\n- details: {}",
            record.user_id, record.status, record.invoice, record.details
        );

        self.llm_client
            .complete(&[
                ChatMessage::system(format!("{}\n\n{}", BILLING_AGENT_PROMPT, record_context)),
                ChatMessage::user(query),
            ])
            .await
            .map_err(AgentError::Completion)
    }

    async fn technical_agent(&self, query: &str) -> Result<String, AgentError> {
        self.llm_client
            .complete(&[
                ChatMessage::system(TECHNICAL_AGENT_PROMPT),
                ChatMessage::user(query),
            ])
            .await
            .map_err(AgentError::Completion)
    }
}

#[async_trait]
impl AgentGraph for SupportGraph {
    #[tracing::instrument(skip(self, state), fields(messages = state.messages.len()))]
    async fn invoke(&self, mut state: AgentState) -> Result<AgentState, AgentError> {
        let query = state
            .messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.clone())
            .ok_or(AgentError::EmptyState)?;

        let route = self.route(&query).await?;
        let reply = match route {
            SupportRoute::Billing => self.billing_agent(&query).await?,
            SupportRoute::Technical => self.technical_agent(&query).await?,
        };

        state.route = Some(route);
        state.messages.push(ChatMessage::assistant(reply.trim()));
        Ok(state)
    }
}

pub fn extract_user_id(query: &str) -> Option<&str> {
    USER_ID.find(query).map(|m| m.as_str())
}
