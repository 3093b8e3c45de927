//! Hosted database client
//!
//! Thin REST client for the hosted Postgres service: PostgREST for tables and
//! views (`/rest/v1/{table}`) and the auth service for token introspection
//! (`/auth/v1/user`). Row-level security is enforced by the service, so every
//! query runs under one of three scopes:
//!
//! - [`HostedClient::anon`]: public reads with the anon key
//! - [`HostedClient::as_user`]: the caller's own access token
//! - [`HostedClient::admin`]: the service-role key, when configured

use kernel::error::app_error::AppError;
use kernel::error::kind::ErrorKind;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

/// Postgres unique_violation
pub const UNIQUE_VIOLATION: &str = "23505";

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum HostedError {
    /// The service answered with a non-success status
    #[error("hosted database returned {status}: {message}")]
    Api {
        status: u16,
        /// Postgres SQLSTATE or PostgREST error code
        code: Option<String>,
        message: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Privileged operation requested without a service-role key
    #[error("service-role key not configured")]
    NotConfigured,
}

impl HostedError {
    pub fn code(&self) -> Option<&str> {
        match self {
            HostedError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code() == Some(UNIQUE_VIOLATION)
    }

    /// Status reported to our own clients for this upstream failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HostedError::Network(e) if e.is_timeout() => ErrorKind::GatewayTimeout,
            HostedError::Api { status: 403, .. } => ErrorKind::Forbidden,
            HostedError::NotConfigured => ErrorKind::InternalServerError,
            HostedError::Api { .. } | HostedError::Network(_) | HostedError::Decode(_) => {
                ErrorKind::BadGateway
            }
        }
    }
}

impl From<HostedError> for AppError {
    fn from(err: HostedError) -> Self {
        let message = match err.kind() {
            ErrorKind::GatewayTimeout => "Database timeout",
            ErrorKind::Forbidden => "Not allowed",
            ErrorKind::InternalServerError => "Server misconfigured",
            _ => "Database request failed",
        };
        AppError::new(err.kind(), message).with_source(err)
    }
}

/// PostgREST error body
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    msg: Option<String>,
    details: Option<String>,
}

// ============================================================================
// Client and scopes
// ============================================================================

#[derive(Debug, Clone)]
pub struct HostedConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    pub anon_key: String,
    pub service_role_key: Option<String>,
}

impl HostedConfig {
    fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone)]
pub struct HostedClient {
    http: reqwest::Client,
    config: Arc<HostedConfig>,
}

impl HostedClient {
    pub fn new(config: HostedConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    pub fn anon(&self) -> Scope {
        self.scope(&self.config.anon_key, &self.config.anon_key)
    }

    /// Requests carry the caller's token so row-level policies see them.
    pub fn as_user(&self, access_token: &str) -> Scope {
        self.scope(&self.config.anon_key, access_token)
    }

    pub fn admin(&self) -> Result<Scope, HostedError> {
        match self.config.service_role_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(self.scope(key, key)),
            _ => Err(HostedError::NotConfigured),
        }
    }

    pub fn has_admin(&self) -> bool {
        self.admin().is_ok()
    }

    fn scope(&self, api_key: &str, bearer: &str) -> Scope {
        Scope {
            http: self.http.clone(),
            base_url: self.config.base_url().to_string(),
            api_key: api_key.to_string(),
            bearer: bearer.to_string(),
        }
    }
}

/// Credentials for one class of request.
#[derive(Clone)]
pub struct Scope {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    bearer: String,
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Scope {
    pub fn from(&self, table: &str) -> Query {
        Query {
            scope: self.clone(),
            table: table.to_string(),
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.bearer)
    }
}

// ============================================================================
// Query builder
// ============================================================================

/// One PostgREST request. Filters are ANDed.
#[derive(Debug, Clone)]
pub struct Query {
    scope: Scope,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    offset: Option<usize>,
    limit: Option<usize>,
}

impl Query {
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Case-insensitive LIKE; `%` is the wildcard.
    pub fn ilike(mut self, column: &str, pattern: &str) -> Self {
        self.filters
            .push((column.to_string(), format!("ilike.{pattern}")));
        self
    }

    pub fn in_list<V: Display>(mut self, column: &str, values: &[V]) -> Self {
        let joined = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.filters
            .push((column.to_string(), format!("in.({joined})")));
        self
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.filters.push((column.to_string(), "is.null".to_string()));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{column}.{dir}"));
        self
    }

    /// Inclusive row range, like `LIMIT to-from+1 OFFSET from`.
    pub fn range(mut self, from: usize, to: usize) -> Self {
        self.offset = Some(from);
        self.limit = Some(to.saturating_sub(from) + 1);
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 4);
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            params.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    fn path(&self) -> String {
        format!("/rest/v1/{}", self.table)
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, HostedError> {
        let response = self
            .scope
            .request(Method::GET, &self.path())
            .query(&self.params())
            .send()
            .await?;
        read_json(response, &self.table).await
    }

    /// First row, or `None` when the filter matched nothing.
    pub async fn maybe_single<T: DeserializeOwned>(mut self) -> Result<Option<T>, HostedError> {
        self.limit = Some(1);
        let rows: Vec<T> = self.fetch().await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row and return the stored representation, restricted to
    /// `select` columns when set.
    pub async fn insert<B, T>(self, row: &B) -> Result<T, HostedError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut params = Vec::new();
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        let response = self
            .scope
            .request(Method::POST, &self.path())
            .query(&params)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let rows: Vec<T> = read_json(response, &self.table).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| HostedError::Decode(format!("insert into {} returned no row", self.table)))
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    table: &str,
) -> Result<T, HostedError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let err = api_error(status, &bytes);
        tracing::warn!(table = %table, error = %err, "Hosted database request failed");
        return Err(err);
    }
    serde_json::from_slice(&bytes).map_err(|e| HostedError::Decode(e.to_string()))
}

fn api_error(status: StatusCode, bytes: &[u8]) -> HostedError {
    match serde_json::from_slice::<ApiErrorBody>(bytes) {
        Ok(body) => HostedError::Api {
            status: status.as_u16(),
            code: body.code,
            message: body
                .message
                .or(body.msg)
                .or(body.details)
                .unwrap_or_else(|| status.to_string()),
        },
        Err(_) => HostedError::Api {
            status: status.as_u16(),
            code: None,
            message: String::from_utf8_lossy(bytes).into_owned(),
        },
    }
}

// ============================================================================
// Users
// ============================================================================

/// Identity behind an access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Resolves access tokens to users.
#[trait_variant::make(UserStore: Send)]
pub trait LocalUserStore {
    /// `Ok(None)` when the token is unknown, expired or revoked.
    async fn user_for_token(&self, access_token: &str) -> Result<Option<AuthUser>, HostedError>;
}

impl UserStore for HostedClient {
    async fn user_for_token(&self, access_token: &str) -> Result<Option<AuthUser>, HostedError> {
        let response = self
            .as_user(access_token)
            .request(Method::GET, "/auth/v1/user")
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!("Access token rejected by auth service");
                Ok(None)
            }
            _ => read_json(response, "auth.users").await.map(Some),
        }
    }
}
