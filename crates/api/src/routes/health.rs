//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use telemetry::metrics;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub identify_configured: bool,
    pub requests_received: u64,
    pub rate_limited_requests: u64,
}

/// GET /health - Full health check.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let configured = state.identifier.is_configured();

    Json(HealthResponse {
        status: if configured { "healthy" } else { "degraded" }.to_string(),
        identify_configured: configured,
        requests_received: metrics().requests_received.get(),
        rate_limited_requests: metrics().rate_limited_requests.get(),
    })
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    StatusCode::OK
}
