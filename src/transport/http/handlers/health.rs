use crate::transport::http::types::{HealthResponse, SERVICE_NAME};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use tracing::debug;

/// Liveness probe for monitors and load balancers. Does not touch the store.
#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn healthcheck_handler() -> impl IntoResponse {
    debug!("health check endpoint called");
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "UP".to_string(),
            timestamp: Utc::now(),
            service: SERVICE_NAME.to_string(),
        }),
    )
}
