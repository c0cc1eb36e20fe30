mod http_billing_gateway;

pub use http_billing_gateway::HttpBillingGateway;
