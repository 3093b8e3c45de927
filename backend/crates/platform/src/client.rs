//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Who is calling, as far as the request can tell.
///
/// Used as the rate-limit key and recorded with offers for abuse review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    /// Client IP address (from X-Forwarded-For or direct connection)
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

impl ClientContext {
    pub fn from_headers(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Self {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .map(str::to_string);

        Self {
            ip: extract_client_ip(headers, direct_ip),
            user_agent,
        }
    }

    /// IP as string, `"unknown"` when neither proxy header nor socket gave one.
    pub fn ip_or_unknown(&self) -> String {
        self.ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Rate-limit key for a named bucket: `"{ip}::{bucket}"`.
    ///
    /// The IP comes from [`extract_client_ip`] and carries its proxy assumption.
    pub fn rate_key(&self, bucket: &str) -> String {
        format!("{}::{}", self.ip_or_unknown(), bucket)
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
///
/// The first X-Forwarded-For entry is trusted as-is, so the API must sit
/// behind a proxy that overwrites that header. Exposed directly, a client
/// picks its own rate-limit key.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}
