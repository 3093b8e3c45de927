//! Browser Bootstrap Config
//!
//! The single-page app fetches the public database URL and anon key at load
//! time instead of baking them into the bundle.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use platform::web::no_store;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SpaEnv {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct SpaEnvResponse<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    #[serde(rename = "SUPABASE_URL")]
    supabase_url: &'a str,
    #[serde(rename = "SUPABASE_ANON_KEY")]
    supabase_anon_key: &'a str,
}

/// GET spa_env
///
/// A missing value still answers JSON, with whatever was found.
pub async fn spa_env(State(env): State<Arc<SpaEnv>>) -> impl IntoResponse {
    let url = env.supabase_url.as_deref().unwrap_or_default();
    let anon_key = env.supabase_anon_key.as_deref().unwrap_or_default();

    if url.is_empty() || anon_key.is_empty() {
        tracing::error!("Supabase URL or anon key missing for spa_env");
        let body = SpaEnvResponse {
            ok: false,
            error: Some("Missing Supabase envs"),
            supabase_url: url,
            supabase_anon_key: anon_key,
        };
        return (StatusCode::INTERNAL_SERVER_ERROR, no_store(), Json(body)).into_response();
    }

    let body = SpaEnvResponse {
        ok: true,
        error: None,
        supabase_url: url,
        supabase_anon_key: anon_key,
    };
    (StatusCode::OK, no_store(), Json(body)).into_response()
}
