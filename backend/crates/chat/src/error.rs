//! Chat Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::hosted::HostedError;
use thiserror::Error;

/// Chat-specific result type alias
pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Rate limiting, already shaped for the client
    #[error("{0}")]
    Rejected(AppError),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("chat_id is required")]
    MissingChatId,

    #[error("Invalid message")]
    InvalidMessage,

    #[error("Hosted database error: {0}")]
    Hosted(#[from] HostedError),
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::Rejected(e) => e.kind(),
            ChatError::AuthRequired | ChatError::InvalidToken => ErrorKind::Unauthorized,
            ChatError::MissingChatId | ChatError::InvalidMessage => ErrorKind::BadRequest,
            ChatError::Hosted(e) => e.kind(),
        }
    }

    pub fn to_app_error(self) -> AppError {
        match self {
            ChatError::Rejected(err) => err,
            ChatError::Hosted(err) => err.into(),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ChatError::Hosted(e) => tracing::error!(error = %e, "Chat database error"),
            ChatError::Rejected(_) => tracing::warn!("Chat rate limit exceeded"),
            ChatError::InvalidToken => tracing::warn!("Chat access token rejected"),
            _ => tracing::debug!(error = %self, "Chat request rejected"),
        }
    }
}

impl From<AppError> for ChatError {
    fn from(err: AppError) -> Self {
        ChatError::Rejected(err)
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
