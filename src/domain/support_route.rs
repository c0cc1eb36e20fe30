use std::fmt;

/// Specialised agent a support query is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportRoute {
    Billing,
    Technical,
}

impl SupportRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportRoute::Billing => "billing",
            SupportRoute::Technical => "technical",
        }
    }

    /// Reads a router verdict. Anything without a clear billing verdict is technical.
    pub fn from_verdict(verdict: &str) -> Self {
        let normalized = verdict.trim().to_lowercase();
        if normalized.starts_with("billing")
            || (normalized.contains("billing") && !normalized.contains("technical"))
        {
            Self::Billing
        } else {
            Self::Technical
        }
    }
}

impl fmt::Display for SupportRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
