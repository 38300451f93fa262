//! Identify endpoint handler.
//!
//! Pipeline: credential check, rate limit, multipart parse, upload
//! validation, provider call, normalization, enrichment. Every stage
//! before the provider call fails fast without network activity.

use axum::{
    extract::{
        multipart::MultipartRejection,
        Multipart, State,
    },
    Json,
};
use canopy_core::{normalize, Error, IdentifyResponse, UploadBatch, UploadedImage};
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, info, warn};

use crate::enrich::attach_photos;
use crate::extractors::ClientIp;
use crate::response::ApiError;
use crate::state::AppState;

/// POST /api/identify - proxy an image upload to the identification
/// provider and return normalized, enriched results.
pub async fn identify_handler(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<IdentifyResponse>, ApiError> {
    let start = Instant::now();

    metrics().requests_received.inc();

    // Misconfiguration is an operator problem; surface it before
    // spending the client's rate budget.
    if !state.identifier.is_configured() {
        return Err(ApiError::from(Error::MissingCredential));
    }

    let decision = state.rate_limiter.check(&client_ip);
    if decision.limited {
        metrics().rate_limited_requests.inc();
        warn!(client = %client_ip, retry_after = decision.retry_after_secs, "Rate limit exceeded");
        return Err(ApiError::from(Error::RateLimited {
            retry_after_secs: decision.retry_after_secs,
        }));
    }

    // A request that is not multipart at all gets the same client
    // message as one with a broken body.
    let multipart = multipart.map_err(|_| ApiError::from(Error::InvalidFormData))?;
    let batch = read_batch(multipart).await?;

    batch.validate().map_err(|e| {
        metrics().validation_failures.inc();
        debug!(client = %client_ip, error = %e, "Upload rejected");
        ApiError::from(e)
    })?;

    debug!(
        client = %client_ip,
        images = batch.images.len(),
        total_bytes = batch.total_bytes(),
        "Upload accepted"
    );

    let payload = state.identifier.identify(&batch).await.map_err(|e| {
        metrics().upstream_errors.inc();
        ApiError::from(e)
    })?;

    let mut results = normalize(&payload);

    attach_photos(&state.observations, &mut results).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().identify_latency_ms.observe(latency_ms);

    info!(
        client = %client_ip,
        results = results.len(),
        latency_ms = latency_ms,
        "Identify request served"
    );

    Ok(Json(IdentifyResponse { results }))
}

/// Collect the `images` parts of the multipart body.
///
/// Any parse failure, including a malformed or truncated body, maps to
/// a single client-facing "Invalid form data." error. Parts under any
/// other field name are ignored.
async fn read_batch(mut multipart: Multipart) -> Result<UploadBatch, ApiError> {
    let mut images = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return Err(ApiError::from(Error::InvalidFormData)),
        };

        if field.name() != Some("images") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("image.jpg").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::from(Error::InvalidFormData))?;

        images.push(UploadedImage::new(file_name, content_type, bytes));
    }

    Ok(UploadBatch::new(images))
}
