use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

/// Best-effort client address used to key rate limits.
///
/// Taken from the first `X-Forwarded-For` entry, then `X-Real-IP`, else `unknown`.
/// Clients can send these headers themselves, so the server must sit behind a
/// trusted proxy that overwrites them. Without one every request can pick its
/// own key; the limiter's `max_tracked_clients` cap bounds the memory this costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let forwarded = headers
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let real_ip = || {
            headers
                .get("X-Real-IP")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        ClientIp(forwarded.or_else(real_ip).unwrap_or("unknown").to_string())
    }

    /// Rate-limit key for this client on one route.
    pub fn key(&self, route: &str) -> String {
        format!("{}:{}", self.0, route)
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
