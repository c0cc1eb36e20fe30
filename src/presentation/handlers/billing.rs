use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::{BILLING_NOT_FOUND_DETAIL, BillingService};

#[derive(Deserialize)]
pub struct BillingQuery {
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct BillingDetailResponse {
    pub detail: String,
}

#[tracing::instrument(skip(service, query), fields(user_id = ?query.user_id))]
pub async fn billing_handler(
    State(service): State<Arc<BillingService>>,
    Query(query): Query<BillingQuery>,
) -> Response {
    let Some(user_id) = query.user_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(BillingDetailResponse {
                detail: "Missing required query parameter: user_id".to_string(),
            }),
        )
            .into_response();
    };

    match service.lookup(&user_id).await {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(BillingDetailResponse {
                detail: BILLING_NOT_FOUND_DETAIL.to_string(),
            }),
        )
            .into_response(),
    }
}
