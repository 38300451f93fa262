//! Request extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Client identifier used as the rate-limiter partition key.
///
/// First entry of `X-Forwarded-For`, else `X-Real-Ip`, else a fixed
/// `"unknown"` marker. Client-supplied headers are trusted as-is:
/// there is no reverse-proxy trust boundary here, which makes the key
/// spoofable. Known limitation, deliberately not hardened.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(xff) = parts.headers.get("X-Forwarded-For") {
            if let Ok(xff_str) = xff.to_str() {
                // Take the first IP in the chain
                if let Some(ip) = xff_str.split(',').next() {
                    let ip = ip.trim();
                    if !ip.is_empty() {
                        return Ok(ClientIp(ip.to_string()));
                    }
                }
            }
        }

        if let Some(real_ip) = parts.headers.get("X-Real-Ip") {
            if let Ok(ip) = real_ip.to_str() {
                return Ok(ClientIp(ip.to_string()));
            }
        }

        Ok(ClientIp("unknown".to_string()))
    }
}
