use async_trait::async_trait;

use crate::domain::BillingRecord;

#[async_trait]
pub trait BillingGateway: Send + Sync {
    /// `Ok(None)` when the billing system does not know the user.
    async fn lookup(&self, user_id: &str) -> Result<Option<BillingRecord>, BillingGatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BillingGatewayError {
    #[error("billing api connection failed: {0}")]
    ConnectionFailed(String),
    #[error("billing api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid billing response: {0}")]
    InvalidResponse(String),
    #[error("billing client configuration: {0}")]
    Configuration(String),
}
