//! Social Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type SocialResult<T> = Result<T, SocialError>;

#[derive(Debug, Error)]
pub enum SocialError {
    /// Malformed input
    #[error("{0}")]
    Validation(String),

    /// Missing referenced entity
    #[error("{0}")]
    NotFound(String),

    /// Duplicate resource (existing profile, duplicate post, duplicate
    /// follow edge)
    #[error("{0}")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl SocialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SocialError::Validation(_) => ErrorKind::BadRequest,
            SocialError::NotFound(_) => ErrorKind::NotFound,
            SocialError::Conflict(_) => ErrorKind::Conflict,
            SocialError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }
}

impl IntoResponse for SocialError {
    fn into_response(self) -> Response {
        if let SocialError::Database(e) = &self {
            tracing::error!(error = %e, "Social database error");
        }
        self.to_app_error().into_response()
    }
}
