//! Sign-Out Use Case
//!
//! Invalidates the presented refresh token by denylisting its jti.
//! Idempotent failure: a second sign-out with the same token is an
//! invalid-token error, matching an expired or forged one.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::domain::repository::TokenDenylistRepository;
use crate::error::AuthResult;

pub struct SignOutUseCase<R> {
    tokens: TokenService<R>,
}

impl<R> SignOutUseCase<R>
where
    R: TokenDenylistRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            tokens: TokenService::new(config, repo),
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<()> {
        self.tokens.invalidate(refresh_token).await
    }
}
