//! Catalog Error Types
//!
//! Catalog-specific error variants that integrate with the unified
//! `kernel::error::AppError` response format.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::hosted::HostedError;
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Required query parameter absent or blank
    #[error("Missing {0}")]
    MissingParam(&'static str),

    /// Query parameter present but unusable
    #[error("Invalid {0}")]
    InvalidParam(&'static str),

    #[error("Invalid mode")]
    InvalidMode,

    #[error("{0}")]
    NotFound(&'static str),

    /// Hosted database failure
    #[error("Hosted database error: {0}")]
    Hosted(#[from] HostedError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::MissingParam(_)
            | CatalogError::InvalidParam(_)
            | CatalogError::InvalidMode => ErrorKind::BadRequest,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::Hosted(e) => e.kind(),
        }
    }

    /// Upstream details stay in the logs; clients see a generic message.
    pub fn to_app_error(self) -> AppError {
        match self {
            CatalogError::Hosted(err) => err.into(),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CatalogError::Hosted(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog request rejected");
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
