//! API routes.

pub mod health;
pub mod identify;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use canopy_core::limits::MAX_UPLOAD_BYTES;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/identify", post(identify::identify_handler))
        .route("/health", get(health::health_handler))
        .route("/health/live", get(health::live_handler))
        // Raised above the aggregate upload cap so the validator, not
        // the framework's default 2MB limit, produces the 413.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
