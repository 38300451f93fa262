//! Pl@ntNet identification client.
//!
//! Forwards a validated upload batch to the "identify across all
//! organs" endpoint. Transport failures, HTTP rejections, and missing
//! configuration each surface as distinct error variants so the HTTP
//! layer can map them to the right status.

use async_trait::async_trait;
use canopy_core::{Error, Result, UploadBatch};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, warn};

use crate::IdentifyProvider;

/// Default identify-all endpoint.
pub const DEFAULT_IDENTIFY_URL: &str = "https://my-api.plantnet.org/v2/identify/all";

/// File name used when a multipart part arrives without one.
const FALLBACK_FILE_NAME: &str = "image.jpg";

/// Pl@ntNet client configuration.
#[derive(Debug, Clone)]
pub struct PlantNetConfig {
    /// Identify endpoint URL.
    pub url: String,
    /// API credential, passed as the `api-key` query parameter.
    /// `None` means the service is misconfigured; identify calls fail
    /// before any network activity.
    pub api_key: Option<String>,
}

impl Default for PlantNetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_IDENTIFY_URL.to_string(),
            api_key: None,
        }
    }
}

/// HTTP-backed identification client.
///
/// No request timeout is configured; a hung upstream call holds the
/// request open. See DESIGN.md before changing that.
pub struct PlantNetClient {
    http: reqwest::Client,
    config: PlantNetConfig,
}

impl PlantNetClient {
    pub fn new(config: PlantNetConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn build_form(batch: &UploadBatch) -> Form {
        let mut form = Form::new();
        for image in &batch.images {
            let file_name = if image.file_name.is_empty() {
                FALLBACK_FILE_NAME.to_string()
            } else {
                image.file_name.clone()
            };

            // Batches are pre-validated, so the declared type is one of
            // the two allowed image MIME types and always parses.
            let part = Part::bytes(image.bytes.to_vec())
                .file_name(file_name)
                .mime_str(&image.content_type)
                .unwrap_or_else(|_| Part::bytes(image.bytes.to_vec()));

            // Every image is paired with an organ hint; `auto` defers
            // organ classification to the provider.
            form = form.part("images", part).text("organs", "auto");
        }
        form
    }
}

#[async_trait]
impl IdentifyProvider for PlantNetClient {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn identify(&self, batch: &UploadBatch) -> Result<Value> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(Error::MissingCredential)?;

        debug!(
            images = batch.images.len(),
            total_bytes = batch.total_bytes(),
            "Forwarding batch to identification provider"
        );

        let response = self
            .http
            .post(&self.config.url)
            .query(&[("api-key", api_key)])
            .multipart(Self::build_form(batch))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Identification provider unreachable");
                Error::unreachable(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let details = extract_details(status.as_u16(), &body);
            warn!(status = %status, "Identification provider rejected the request");
            return Err(Error::rejected(status.as_u16(), details));
        }

        // An empty or non-JSON 2xx body degrades to an empty result
        // set rather than an error.
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| Value::Object(Default::default())))
    }
}

/// Best-effort detail extraction from a rejection body.
///
/// Prefers a human-readable `message`/`error` field when the body is
/// JSON, falls back to the raw text, and appends a hint for statuses
/// that usually mean a credential problem.
fn extract_details(status: u16, body: &str) -> Option<String> {
    let text = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|parsed| {
            parsed
                .get("message")
                .or_else(|| parsed.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

    let hint = match status {
        401 | 403 => "credential may be invalid or restricted",
        _ => "the provider could not process the request",
    };

    match text {
        Some(text) => Some(format!("{} ({})", text, hint)),
        None => Some(hint.to_string()),
    }
}
