use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use demohub::application::services::BillingService;
use demohub::infrastructure::observability::{TracingConfig, init_tracing};
use demohub::presentation::{Environment, Settings, create_billing_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(
        "billing-api",
        environment,
        &settings.logging,
    ));

    let billing = &settings.billing_api;
    let service = Arc::new(BillingService::with_fixtures(Duration::from_millis(
        billing.delay_ms,
    )));

    let addr = format!("{}:{}", billing.host, billing.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Billing API listening on http://{}", addr);

    axum::serve(listener, create_billing_router(service))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down billing API");
        })
        .await?;

    Ok(())
}
