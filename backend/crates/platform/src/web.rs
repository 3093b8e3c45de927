//! HTTP helpers shared by every router
//!
//! - [`LenientJson`]: request body extractor that never fails on bad JSON
//! - [`cache_public`] / [`no_store`]: `Cache-Control` header parts

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderName, StatusCode, header};
use kernel::error::app_error::AppError;
use serde::de::DeserializeOwned;

/// Largest JSON body accepted.
pub const MAX_BODY_BYTES: usize = 1_000_000;

/// JSON body where an empty or malformed payload becomes `T::default()`.
///
/// Handlers then report the missing field by name ("Missing: phone"), which
/// reads better than a generic parse error. Bodies above
/// [`MAX_BODY_BYTES`] are rejected with 413.
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::payload_too_large("Payload too large")
            } else {
                AppError::bad_request("Could not read request body")
            }
        })?;

        if bytes.len() > MAX_BODY_BYTES {
            return Err(AppError::payload_too_large("Payload too large"));
        }
        Ok(Self(parse_or_default(&bytes)))
    }
}

fn parse_or_default<T: DeserializeOwned + Default>(bytes: &[u8]) -> T {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return T::default();
    }
    serde_json::from_slice(bytes).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "Ignoring malformed JSON body");
        T::default()
    })
}

/// `Cache-Control: public, max-age=N, s-maxage=N`
pub fn cache_public(secs: u32) -> [(HeaderName, String); 1] {
    [(
        header::CACHE_CONTROL,
        format!("public, max-age={secs}, s-maxage={secs}"),
    )]
}

/// `Cache-Control: no-store` for mutations and per-user reads.
pub fn no_store() -> [(HeaderName, String); 1] {
    [(header::CACHE_CONTROL, "no-store".to_string())]
}
