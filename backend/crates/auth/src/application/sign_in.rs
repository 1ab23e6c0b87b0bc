//! Sign-In Use Case
//!
//! Every failure mode (unknown email, wrong password, unverified or
//! deactivated account) maps to the same generic error, so responses
//! never reveal whether an email is registered.

use std::sync::Arc;

use chrono::Utc;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::token_service::{TokenPair, TokenService};
use crate::domain::repository::{AccountRepository, TokenDenylistRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Debug)]
pub struct SignInOutput {
    pub email: Email,
    pub full_name: String,
    pub tokens: TokenPair,
}

pub struct SignInUseCase<R> {
    repo: Arc<R>,
    tokens: TokenService<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository + TokenDenylistRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            tokens: TokenService::new(config.clone(), repo.clone()),
            repo,
            config,
        }
    }

    pub async fn execute(&self, email: String, password: String) -> AuthResult<SignInOutput> {
        let email = Email::new(email).map_err(|_| AuthError::AuthFailed)?;
        let password = ClearTextPassword::new(password).map_err(|_| AuthError::AuthFailed)?;

        let Some(mut account) = self.repo.find_by_email(&email).await? else {
            return Err(AuthError::AuthFailed);
        };

        // Check the password before account state so timing does not
        // depend on which precondition failed
        if !account.password_hash.verify(&password, self.config.pepper()) {
            return Err(AuthError::AuthFailed);
        }

        if !account.can_login() {
            return Err(AuthError::AuthFailed);
        }

        let tokens = self.tokens.issue(account.account_id)?;

        account.record_login(Utc::now());
        self.repo.update(&account).await?;

        tracing::info!(account_id = %account.account_id, "Signed in");

        Ok(SignInOutput {
            full_name: account.full_name(),
            email: account.email,
            tokens,
        })
    }
}
