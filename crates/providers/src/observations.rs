//! iNaturalist observations client.
//!
//! Used by the enrichment stage to find one recent, photo-bearing
//! observation for a taxon name. Every failure here is recoverable by
//! the caller, so errors carry just enough context for a log line.

use async_trait::async_trait;
use canopy_core::{Error, Result};
use serde_json::Value;
use tracing::debug;

use crate::ObservationProvider;

/// Default observations search endpoint.
pub const DEFAULT_OBSERVATIONS_URL: &str = "https://api.inaturalist.org/v1/observations";

/// iNaturalist client configuration.
#[derive(Debug, Clone)]
pub struct InatConfig {
    pub url: String,
}

impl Default for InatConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_OBSERVATIONS_URL.to_string(),
        }
    }
}

/// HTTP-backed observation photo lookup.
pub struct InatClient {
    http: reqwest::Client,
    config: InatConfig,
}

impl InatClient {
    pub fn new(config: InatConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ObservationProvider for InatClient {
    async fn latest_photo(&self, taxon: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(&self.config.url)
            .query(&[
                ("taxon_name", taxon),
                ("per_page", "1"),
                ("order", "desc"),
                ("order_by", "created_at"),
                ("photos", "true"),
                ("quality_grade", "research,needs_id"),
            ])
            .send()
            .await
            .map_err(|e| Error::unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::rejected(response.status().as_u16(), None));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::internal(e.to_string()))?;

        let url = first_photo_url(&payload).map(upgrade_photo_size);
        debug!(taxon = %taxon, found = url.is_some(), "Observation photo lookup");
        Ok(url)
    }
}

/// Pull `results[0].photos[0].url` out of the observations payload.
fn first_photo_url(payload: &Value) -> Option<String> {
    payload
        .get("results")?
        .as_array()?
        .first()?
        .get("photos")?
        .as_array()?
        .first()?
        .get("url")?
        .as_str()
        .map(str::to_string)
}

/// Observation search returns thumbnail ("square") renditions; swap
/// the size token for the larger "medium" variant.
fn upgrade_photo_size(url: String) -> String {
    url.replacen("square", "medium", 1)
}
