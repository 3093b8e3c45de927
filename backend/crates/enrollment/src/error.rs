//! Enrollment Error Types
//!
//! Enrollment-specific error variants that integrate with the unified
//! `kernel::error::AppError` response format.

use crate::domain::otp_token::TokenError;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::hosted::HostedError;
use thiserror::Error;

/// Enrollment-specific result type alias
pub type EnrollmentResult<T> = Result<T, EnrollmentError>;

/// Failure talking to the SMS verification provider
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("verification provider not configured")]
    NotConfigured,

    /// The provider answered with an error; `message` is safe to show
    #[error("verification provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// Input validation or rate limiting, already shaped for the client
    #[error("{0}")]
    Rejected(AppError),

    #[error("Missing: {0}")]
    MissingField(&'static str),

    #[error("Invalid channel, use 'sms' or 'call'")]
    InvalidChannel,

    #[error("Service is required")]
    ServiceRequired,

    #[error("Invalid service")]
    InvalidServiceId,

    #[error("Unknown service")]
    UnknownService,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Phone not verified or session expired")]
    OtpSession(#[source] TokenError),

    #[error("OTP token does not match this phone number")]
    OtpPhoneMismatch,

    #[error("Company already exists")]
    CompanyExists,

    /// Required server-side credentials are absent
    #[error("Server misconfigured: {0}")]
    Misconfigured(&'static str),

    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("Hosted database error: {0}")]
    Hosted(#[from] HostedError),
}

impl EnrollmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnrollmentError::Rejected(e) => e.kind(),
            EnrollmentError::MissingField(_)
            | EnrollmentError::InvalidChannel
            | EnrollmentError::ServiceRequired
            | EnrollmentError::InvalidServiceId
            | EnrollmentError::UnknownService => ErrorKind::BadRequest,
            EnrollmentError::AuthRequired
            | EnrollmentError::InvalidToken
            | EnrollmentError::OtpSession(_)
            | EnrollmentError::OtpPhoneMismatch => ErrorKind::Unauthorized,
            EnrollmentError::CompanyExists => ErrorKind::Conflict,
            EnrollmentError::Misconfigured(_)
            | EnrollmentError::Verification(VerificationError::NotConfigured) => {
                ErrorKind::InternalServerError
            }
            EnrollmentError::Verification(_) => ErrorKind::BadGateway,
            EnrollmentError::Hosted(e) => e.kind(),
        }
    }

    pub fn to_app_error(self) -> AppError {
        match self {
            EnrollmentError::Rejected(err) => err,
            EnrollmentError::Hosted(err) => err.into(),
            EnrollmentError::Misconfigured(_) => AppError::internal("Server misconfigured"),
            EnrollmentError::Verification(VerificationError::NotConfigured) => {
                AppError::internal("Verification provider not configured")
            }
            EnrollmentError::Verification(VerificationError::Api { message, .. }) => {
                AppError::bad_gateway(message)
            }
            EnrollmentError::Verification(err) => {
                AppError::bad_gateway("Verification request failed").with_source(err)
            }
            err @ EnrollmentError::OtpSession(_) => {
                AppError::new(err.kind(), err.to_string()).with_action("Request a new code")
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            EnrollmentError::Hosted(e) => {
                tracing::error!(error = %e, "Enrollment database error");
            }
            EnrollmentError::Verification(e) => {
                tracing::error!(error = %e, "Verification provider error");
            }
            EnrollmentError::Misconfigured(what) => {
                tracing::error!(missing = %what, "Enrollment misconfigured");
            }
            EnrollmentError::Rejected(e) if e.kind() == ErrorKind::TooManyRequests => {
                tracing::warn!("Enrollment rate limit exceeded");
            }
            EnrollmentError::OtpSession(e) => {
                tracing::warn!(reason = %e, "OTP session token rejected");
            }
            EnrollmentError::OtpPhoneMismatch | EnrollmentError::InvalidToken => {
                tracing::warn!(error = %self, "Enrollment token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Enrollment request rejected");
            }
        }
    }
}

impl From<AppError> for EnrollmentError {
    fn from(err: AppError) -> Self {
        EnrollmentError::Rejected(err)
    }
}

impl From<EnrollmentError> for AppError {
    fn from(err: EnrollmentError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for EnrollmentError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
