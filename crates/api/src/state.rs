//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use providers::{IdentifyProvider, ObservationProvider};

use crate::middleware::rate_limit::{RateLimiter, SharedRateLimiter};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Identification provider (Pl@ntNet in production, mock in tests)
    pub identifier: Arc<dyn IdentifyProvider>,
    /// Observation photo provider for enrichment
    pub observations: Arc<dyn ObservationProvider>,
    /// Per-client rate limiter
    pub rate_limiter: SharedRateLimiter,
}

impl AppState {
    pub fn new(
        identifier: Arc<dyn IdentifyProvider>,
        observations: Arc<dyn ObservationProvider>,
    ) -> Self {
        Self {
            identifier,
            observations,
            rate_limiter: Arc::new(RateLimiter::new()),
        }
    }

    /// Start the rate limiter cleanup background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_rate_limiter_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let rate_limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(3600));
            loop {
                interval.tick().await;
                rate_limiter.cleanup();
            }
        })
    }
}
