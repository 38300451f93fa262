//! Outbound provider clients for the Canopy identify proxy.
//!
//! Both providers sit behind `async_trait` seams so the HTTP layer and
//! the test suite can substitute in-memory implementations.

pub mod observations;
pub mod plantnet;

use async_trait::async_trait;
use canopy_core::{Result, UploadBatch};
use serde_json::Value;

/// Identification provider seam.
///
/// Returns the raw provider payload; normalization happens in
/// `canopy-core` so the wire shape stays deliberately loose here.
#[async_trait]
pub trait IdentifyProvider: Send + Sync {
    async fn identify(&self, batch: &UploadBatch) -> Result<Value>;

    /// Whether the provider has the credentials it needs. Checked
    /// before any request work so misconfiguration fails fast.
    fn is_configured(&self) -> bool;
}

/// Observation photo provider seam used by enrichment.
#[async_trait]
pub trait ObservationProvider: Send + Sync {
    /// Look up a representative photo URL for a taxon name.
    ///
    /// `Ok(None)` means no usable photo; errors are expected to be
    /// swallowed by the caller (enrichment is best-effort).
    async fn latest_photo(&self, taxon: &str) -> Result<Option<String>>;
}

pub use observations::{InatClient, InatConfig};
pub use plantnet::{PlantNetClient, PlantNetConfig};
