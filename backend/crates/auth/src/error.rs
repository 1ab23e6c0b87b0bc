//! Auth Error Types
//!
//! Auth-specific error variants carrying the domain taxonomy, integrated
//! with the unified `kernel::error::AppError` system at the boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::mailer::MailError;
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or conflicting input, with field-level detail
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or unverified account. Deliberately generic to
    /// avoid account enumeration.
    #[error("Invalid credentials, try again")]
    AuthFailed,

    /// Missing referenced entity
    #[error("{0}")]
    NotFound(String),

    /// Invalid or expired reset ticket / bearer token
    #[error("{0}")]
    Unauthorized(String),

    /// Duplicate resource
    #[error("{0}")]
    Conflict(String),

    /// Refresh token malformed, expired, or already invalidated
    #[error("Token is invalid or has expired")]
    InvalidToken,

    /// Email delivery failure (outbound collaborator)
    #[error("Email delivery failed: {0}")]
    Upstream(#[from] MailError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::AuthFailed
            | AuthError::Unauthorized(_)
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            AuthError::Upstream(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::AuthFailed | AuthError::Unauthorized(_) | AuthError::InvalidToken => {
                ErrorKind::Unauthorized
            }
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::Upstream(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Upstream(e) => {
                tracing::error!(error = %e, "Email delivery failure");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::AuthFailed => {
                tracing::warn!("Failed login attempt");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Rejected invalid refresh token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<PasswordPolicyError> for AuthError {
    fn from(err: PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
