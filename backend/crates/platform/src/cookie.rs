//! Access-token extraction
//!
//! Callers authenticate with the hosted database's access token, sent either
//! as `Authorization: Bearer <token>` or in one of the cookies the browser
//! SDK writes. Cookie values may be percent-encoded JSON session objects.

use axum::http::{HeaderMap, header};

/// Cookies the browser SDK has used for the session, in lookup order.
pub const SESSION_COOKIE_NAMES: [&str; 3] = ["sb-access-token", "sb:token", "supabase-auth-token"];

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

/// Token of an `Authorization: Bearer <token>` header. The scheme is matched
/// case-insensitively.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(char::is_whitespace)?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

/// Bearer header first, then the session cookies.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer(headers) {
        return Some(token);
    }
    SESSION_COOKIE_NAMES
        .iter()
        .filter_map(|name| extract_cookie(headers, name))
        .find(|value| !value.is_empty())
        .map(|value| token_from_cookie_value(&value))
}

fn token_from_cookie_value(raw: &str) -> String {
    let Ok(decoded) = urlencoding::decode(raw) else {
        return raw.to_string();
    };
    if decoded.starts_with('{') {
        if let Ok(session) = serde_json::from_str::<serde_json::Value>(&decoded) {
            let token = [
                "/currentSession/access_token",
                "/access_token",
                "/token",
            ]
            .iter()
            .find_map(|pointer| session.pointer(pointer)?.as_str())
            .filter(|token| !token.is_empty());
            if let Some(token) = token {
                return token.to_string();
            }
        }
    }
    decoded.into_owned()
}
