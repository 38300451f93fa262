//! Unified error types for the identify proxy.
//!
//! The taxonomy mirrors the HTTP surface:
//! - client errors (bad uploads, rate limit) map to 4xx
//! - configuration errors (missing credential) map to 500
//! - upstream errors (unreachable / rejected) map to 502

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the identify proxy.
#[derive(Debug, Error)]
pub enum Error {
    /// The multipart body could not be parsed at all.
    #[error("Invalid form data.")]
    InvalidFormData,

    /// The request carried no `images` parts.
    #[error("Please provide at least one image.")]
    NoImages,

    /// More than the allowed number of images.
    #[error("Please send no more than five images.")]
    TooManyImages,

    /// Aggregate upload size over the limit.
    #[error("Total upload size exceeds 50MB.")]
    PayloadTooLarge,

    /// A file declared a content type outside the allow-list.
    /// Carries the first offending declared type.
    #[error("Only JPEG or PNG images are supported.")]
    UnsupportedType { content_type: String },

    /// Per-client request budget exhausted.
    #[error("Rate limit exceeded. Please wait a moment before trying again.")]
    RateLimited { retry_after_secs: u64 },

    /// The identification credential is not configured.
    #[error("PLANTNET_API_KEY is not configured.")]
    MissingCredential,

    /// Transport-level failure reaching the identification provider
    /// (DNS, connection refused, timeout).
    #[error("Unable to reach the identification service.")]
    UpstreamUnreachable(String),

    /// The identification provider answered with a non-2xx status.
    #[error("Identification failed. Try a clearer image.")]
    UpstreamRejected {
        status: u16,
        details: Option<String>,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn unsupported_type(content_type: impl Into<String>) -> Self {
        Self::UnsupportedType {
            content_type: content_type.into(),
        }
    }

    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::UpstreamUnreachable(msg.into())
    }

    pub fn rejected(status: u16, details: Option<String>) -> Self {
        Self::UpstreamRejected { status, details }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidFormData => 400,
            Self::NoImages => 400,
            Self::TooManyImages => 400,
            Self::PayloadTooLarge => 413,
            Self::UnsupportedType { .. } => 400,
            Self::RateLimited { .. } => 429,
            Self::MissingCredential => 500,
            Self::UpstreamUnreachable(_) => 502,
            Self::UpstreamRejected { .. } => 502,
            Self::Internal(_) => 500,
        }
    }
}
