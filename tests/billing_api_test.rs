mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::spawn_server;
use demohub::application::ports::{BillingGateway, BillingGatewayError};
use demohub::application::services::BillingService;
use demohub::infrastructure::billing::HttpBillingGateway;
use demohub::presentation::create_billing_router;

fn billing_app() -> axum::Router {
    create_billing_router(Arc::new(BillingService::with_fixtures(Duration::ZERO)))
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let response = billing_app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn given_overdue_customer_when_looking_up_then_returns_record() {
    let (status, body) = get_json("/api/billing?user_id=12345").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "user_id": "12345",
            "status": "Premium (Overdue)",
            "invoice": "$59.99",
            "details": "Payment pending since Oct 2025."
        })
    );
}

#[tokio::test]
async fn given_active_customer_when_looking_up_then_returns_record() {
    let (status, body) = get_json("/api/billing?user_id=99999").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Basic (Active)");
    assert_eq!(body["invoice"], "$0.00");
    assert_eq!(body["details"], "Next bill due Nov 2025.");
}

#[tokio::test]
async fn given_unknown_customer_when_looking_up_then_returns_not_found_detail() {
    let (status, body) = get_json("/api/billing?user_id=00001").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"detail": "User ID not found in the billing system"})
    );
}

#[tokio::test]
async fn given_padded_id_when_looking_up_then_ids_match_exactly() {
    let (status, _) = get_json("/api/billing?user_id=%2012345").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_missing_user_id_when_looking_up_then_returns_bad_request() {
    let (status, body) = get_json("/api/billing").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Missing required query parameter: user_id");
}

#[tokio::test]
async fn given_billing_service_when_checking_health_then_returns_healthy() {
    let (status, body) = get_json("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn given_configured_delay_when_looking_up_then_waits_before_answering() {
    let service = BillingService::with_fixtures(Duration::from_millis(50));

    let started = std::time::Instant::now();
    let record = service.lookup("12345").await;

    assert!(record.is_some());
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn given_running_billing_api_when_gateway_looks_up_then_parses_record() {
    let (base_url, shutdown) = spawn_server(billing_app()).await;
    let gateway = HttpBillingGateway::new(format!("{}/", base_url)).unwrap();

    let found = gateway.lookup("12345").await.unwrap();
    let missing = gateway.lookup("424242").await.unwrap();

    let record = found.unwrap();
    assert_eq!(record.user_id, "12345");
    assert_eq!(record.status, "Premium (Overdue)");
    assert!(missing.is_none());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn given_stopped_billing_api_when_gateway_looks_up_then_reports_connection_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let gateway =
        HttpBillingGateway::with_timeout(format!("http://{}", addr), Duration::from_secs(2)).unwrap();

    let result = gateway.lookup("12345").await;

    assert!(matches!(result, Err(BillingGatewayError::ConnectionFailed(_))));
}

#[tokio::test]
async fn given_billing_api_error_when_gateway_looks_up_then_reports_request_failure() {
    let app = axum::Router::new().route(
        "/api/billing",
        axum::routing::get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database down") }),
    );
    let (base_url, shutdown) = spawn_server(app).await;
    let gateway = HttpBillingGateway::new(base_url).unwrap();

    let result = gateway.lookup("12345").await;

    match result {
        Err(BillingGatewayError::ApiRequestFailed(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("database down"));
        }
        other => panic!("expected ApiRequestFailed, got {:?}", other),
    }

    let _ = shutdown.send(());
}

#[tokio::test]
async fn given_slow_billing_api_when_gateway_times_out_then_reports_connection_failure() {
    let app = axum::Router::new().route(
        "/api/billing",
        axum::routing::get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            StatusCode::OK
        }),
    );
    let (base_url, shutdown) = spawn_server(app).await;
    let gateway = HttpBillingGateway::with_timeout(base_url, Duration::from_millis(100)).unwrap();

    let started = std::time::Instant::now();
    let result = gateway.lookup("12345").await;

    assert!(matches!(result, Err(BillingGatewayError::ConnectionFailed(_))));
    assert!(started.elapsed() < Duration::from_secs(2));

    let _ = shutdown.send(());
}
