use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::application::ports::{BillingGateway, BillingGatewayError};
use crate::domain::BillingRecord;

/// Client for the billing API's `GET /api/billing` lookup.
pub struct HttpBillingGateway {
    client: Client,
    base_url: String,
}

impl HttpBillingGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BillingGatewayError> {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BillingGatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BillingGatewayError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BillingGateway for HttpBillingGateway {
    async fn lookup(&self, user_id: &str) -> Result<Option<BillingRecord>, BillingGatewayError> {
        let url = format!("{}/api/billing", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("user_id", user_id)])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    BillingGatewayError::ConnectionFailed(e.to_string())
                } else {
                    BillingGatewayError::ApiRequestFailed(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::info!(user_id, "Billing system does not know user");
                Ok(None)
            }
            status if status.is_success() => {
                let record: BillingRecord = response
                    .json()
                    .await
                    .map_err(|e| BillingGatewayError::InvalidResponse(e.to_string()))?;
                tracing::info!(user_id, status = %record.status, "Billing record fetched");
                Ok(Some(record))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(BillingGatewayError::ApiRequestFailed(format!(
                    "HTTP {}: {}",
                    status, body
                )))
            }
        }
    }
}
