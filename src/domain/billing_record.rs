use serde::{Deserialize, Serialize};

/// Billing status of one customer as served by the billing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRecord {
    pub user_id: String,
    pub status: String,
    pub invoice: String,
    pub details: String,
}

impl BillingRecord {
    pub fn new(
        user_id: impl Into<String>,
        status: impl Into<String>,
        invoice: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            status: status.into(),
            invoice: invoice.into(),
            details: details.into(),
        }
    }
}
