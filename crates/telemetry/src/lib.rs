//! Internal telemetry for the Canopy identify proxy.
//!
//! In-memory counters only; the service has no external metrics
//! backend, the health endpoint reads these directly.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;
