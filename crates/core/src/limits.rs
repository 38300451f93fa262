//! Upload and rate limits for the identify proxy.
//!
//! These match the Pl@ntNet free-tier constraints the proxy fronts.
//! Keep the validator, the HTTP body limit, and the docs in sync when
//! changing any of them.

use std::time::Duration;

// === Upload Limits ===

/// Maximum images per identify request.
pub const MAX_IMAGES: usize = 5;

/// Maximum aggregate upload size in bytes (50 MiB).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Declared content types accepted for upload.
///
/// Trusted as declared; no content sniffing is performed.
pub const ALLOWED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

// === Result Limits ===

/// Maximum normalized results per response.
///
/// Upstream results are pre-ranked; truncation preserves rank order.
pub const MAX_RESULTS: usize = 5;

/// Species label used when every fallback in the name chain is empty.
pub const UNKNOWN_SPECIES: &str = "Unknown species";

/// Source tag attached to enrichment photos.
pub const ENRICHMENT_SOURCE: &str = "iNaturalist";

// === Rate Limits (per client IP) ===

/// Requests admitted per minute window.
pub const MINUTE_LIMIT: u32 = 5;

/// Minute window duration.
pub const MINUTE_WINDOW: Duration = Duration::from_secs(60);

/// Requests admitted per day window.
pub const DAY_LIMIT: u32 = 30;

/// Day window duration.
pub const DAY_WINDOW: Duration = Duration::from_secs(86_400);
