//! Stable result shapes returned to clients.

use serde::{Deserialize, Serialize};

/// A photo attached to a result, either from the identification
/// provider's own reference images or from enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A single normalized identification result.
///
/// Constructed per-request from the upstream payload; `image` is
/// attached afterwards by the enrichment stage when a lookup succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifyResult {
    /// Scientific or common name, never empty.
    pub species: String,
    /// Provider confidence, 0 when absent or non-numeric upstream.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Reference photos from the identification provider, upstream order.
    pub images: Vec<ResultImage>,
    /// Best-effort representative photo from the observation provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ResultImage>,
}

/// Response body for `POST /api/identify`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentifyResponse {
    pub results: Vec<IdentifyResult>,
}
