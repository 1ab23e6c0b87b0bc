//! Bearer Authentication Middleware
//!
//! Validates `Authorization: Bearer <access token>` and injects the
//! caller's account id as a request extension.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::AccountId;

use crate::application::config::AuthConfig;
use crate::application::token_service::verify_access;
use crate::error::AuthError;

/// The authenticated caller, available to downstream handlers via
/// `Extension<CurrentAccount>`
#[derive(Debug, Clone, Copy)]
pub struct CurrentAccount {
    pub account_id: AccountId,
}

/// State for [`require_auth`]
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub config: Arc<AuthConfig>,
}

/// Reject the request unless a valid access token is presented
pub async fn require_auth(
    State(state): State<AuthMiddlewareState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AuthError::Unauthorized("Missing bearer token".into()))?;

    let account_id = verify_access(&state.config, token)?;

    request
        .extensions_mut()
        .insert(CurrentAccount { account_id });

    Ok(next.run(request).await)
}
