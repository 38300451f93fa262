//! Mock implementations for testing.

use async_trait::async_trait;
use canopy_core::{Error, Result, UploadBatch};
use parking_lot::Mutex;
use providers::{IdentifyProvider, ObservationProvider};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// How the mock identify provider should fail, when asked to.
#[derive(Debug, Clone)]
pub enum IdentifyFailure {
    Unreachable,
    Rejected { status: u16, details: Option<String> },
}

/// Mock identification provider returning a canned payload.
///
/// Implements the same `IdentifyProvider` trait as the real
/// `PlantNetClient`, so the full router and handler run unchanged
/// without a network dependency.
#[derive(Clone)]
pub struct MockIdentifyProvider {
    payload: Arc<Mutex<Value>>,
    configured: Arc<Mutex<bool>>,
    failure: Arc<Mutex<Option<IdentifyFailure>>>,
    /// Image counts of every batch received.
    batches: Arc<Mutex<Vec<usize>>>,
}

impl MockIdentifyProvider {
    pub fn new() -> Self {
        Self {
            payload: Arc::new(Mutex::new(json!({ "results": [] }))),
            configured: Arc::new(Mutex::new(true)),
            failure: Arc::new(Mutex::new(None)),
            batches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_payload(&self, payload: Value) {
        *self.payload.lock() = payload;
    }

    pub fn set_configured(&self, configured: bool) {
        *self.configured.lock() = configured;
    }

    pub fn set_failure(&self, failure: Option<IdentifyFailure>) {
        *self.failure.lock() = failure;
    }

    /// Image counts of batches that reached the provider.
    pub fn received_batches(&self) -> Vec<usize> {
        self.batches.lock().clone()
    }
}

impl Default for MockIdentifyProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentifyProvider for MockIdentifyProvider {
    fn is_configured(&self) -> bool {
        *self.configured.lock()
    }

    async fn identify(&self, batch: &UploadBatch) -> Result<Value> {
        self.batches.lock().push(batch.images.len());

        if let Some(failure) = self.failure.lock().clone() {
            return Err(match failure {
                IdentifyFailure::Unreachable => Error::unreachable("mock transport failure"),
                IdentifyFailure::Rejected { status, details } => Error::rejected(status, details),
            });
        }

        Ok(self.payload.lock().clone())
    }
}

/// Mock observation provider serving photos from an in-memory map.
#[derive(Clone)]
pub struct MockObservationProvider {
    photos: Arc<Mutex<HashMap<String, String>>>,
    fail_for: Arc<Mutex<Vec<String>>>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockObservationProvider {
    pub fn new() -> Self {
        Self {
            photos: Arc::new(Mutex::new(HashMap::new())),
            fail_for: Arc::new(Mutex::new(Vec::new())),
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_photo(&self, taxon: &str, url: &str) {
        self.photos.lock().insert(taxon.to_string(), url.to_string());
    }

    pub fn fail_for(&self, taxon: &str) {
        self.fail_for.lock().push(taxon.to_string());
    }

    /// Taxon names looked up, in request order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }
}

impl Default for MockObservationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObservationProvider for MockObservationProvider {
    async fn latest_photo(&self, taxon: &str) -> Result<Option<String>> {
        self.lookups.lock().push(taxon.to_string());

        if self.fail_for.lock().iter().any(|t| t == taxon) {
            return Err(Error::unreachable("mock lookup failure"));
        }

        Ok(self.photos.lock().get(taxon).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::UploadedImage;

    #[tokio::test]
    async fn test_mock_identify_returns_payload_and_captures_batch() {
        let mock = MockIdentifyProvider::new();
        mock.set_payload(json!({ "results": [{ "score": 1.0 }] }));

        let batch = UploadBatch::new(vec![UploadedImage::new(
            "a.jpg",
            "image/jpeg",
            vec![0u8; 8],
        )]);

        let payload = mock.identify(&batch).await.unwrap();
        assert_eq!(payload["results"].as_array().unwrap().len(), 1);
        assert_eq!(mock.received_batches(), vec![1]);
    }

    #[tokio::test]
    async fn test_mock_identify_failure_modes() {
        let mock = MockIdentifyProvider::new();
        mock.set_failure(Some(IdentifyFailure::Rejected {
            status: 401,
            details: Some("bad key".to_string()),
        }));

        let batch = UploadBatch::default();
        let err = mock.identify(&batch).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamRejected { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_mock_observations() {
        let mock = MockObservationProvider::new();
        mock.add_photo("Quercus robur", "https://p/1/medium.jpg");
        mock.fail_for("Acer campestre");

        assert_eq!(
            mock.latest_photo("Quercus robur").await.unwrap().as_deref(),
            Some("https://p/1/medium.jpg")
        );
        assert!(mock.latest_photo("Acer campestre").await.is_err());
        assert!(mock.latest_photo("Unknown species").await.unwrap().is_none());
        assert_eq!(mock.lookups().len(), 3);
    }
}
