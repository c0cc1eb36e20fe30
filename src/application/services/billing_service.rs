use std::collections::HashMap;
use std::time::Duration;

use crate::domain::BillingRecord;

pub const BILLING_NOT_FOUND_DETAIL: &str = "User ID not found in the billing system";

/// Fixture billing system backed by a fixed lookup table.
#[derive(Debug, Clone)]
pub struct BillingService {
    records: HashMap<String, BillingRecord>,
    delay: Duration,
}

impl BillingService {
    pub fn new(records: impl IntoIterator<Item = BillingRecord>, delay: Duration) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.user_id.clone(), record))
                .collect(),
            delay,
        }
    }

    /// The two demo customers: 12345 is overdue, 99999 is active.
    pub fn with_fixtures(delay: Duration) -> Self {
        Self::new(
            [
                BillingRecord::new(
                    "12345",
                    "Premium (Overdue)",
                    "$59.99",
                    "Payment pending since Oct 2025.",
                ),
                BillingRecord::new(
                    "99999",
                    "Basic (Active)",
                    "$0.00",
                    "Next bill due Nov 2025.",
                ),
            ],
            delay,
        )
    }

    /// Looks up a user after the configured artificial delay. Ids match exactly.
    #[tracing::instrument(skip(self))]
    pub async fn lookup(&self, user_id: &str) -> Option<BillingRecord> {
        tracing::info!("Received billing request");

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.records.get(user_id) {
            Some(record) => {
                tracing::info!(status = %record.status, "Billing record found");
                Some(record.clone())
            }
            None => {
                tracing::warn!("User not found in billing system");
                None
            }
        }
    }
}
