//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use canopy_core::Error;
use serde::{Deserialize, Serialize};

/// Error response body.
///
/// Every error path returns at least `error`; upstream rejections also
/// carry the provider's HTTP `status` and best-effort `details` text.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            details: None,
        }
    }

    pub fn upstream(error: impl Into<String>, status: u16, details: Option<String>) -> Self {
        Self {
            error: error.into(),
            status: Some(status),
            details,
        }
    }
}

/// API error type mapping the core taxonomy onto HTTP.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
    pub retry_after: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg),
            retry_after: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.response)).into_response();

        // Add Retry-After header for rate limit responses
        if let Some(retry_after) = self.retry_after {
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match err {
            Error::RateLimited { retry_after_secs } => Self {
                status,
                response: ErrorResponse::new(err.to_string()),
                retry_after: Some(retry_after_secs),
            },
            Error::UpstreamRejected {
                status: upstream_status,
                ref details,
            } => Self {
                status,
                response: ErrorResponse::upstream(err.to_string(), upstream_status, details.clone()),
                retry_after: None,
            },
            Error::UpstreamUnreachable(_) => Self {
                status,
                // Transport failures have no upstream status to report.
                response: ErrorResponse::new(err.to_string()),
                retry_after: None,
            },
            _ => Self::new(status, err.to_string()),
        }
    }
}
