//! Passcode Re-delivery Use Case
//!
//! Lets a user who lost the original email request a fresh passcode.
//! The new code supersedes the outstanding one.

use std::sync::Arc;

use platform::mailer::Mailer;

use crate::application::config::AuthConfig;
use crate::application::register::verification_email;
use crate::domain::entity::Passcode;
use crate::domain::repository::{AccountRepository, PasscodeRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

pub struct ResendPasscodeUseCase<R, M> {
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> ResendPasscodeUseCase<R, M>
where
    R: AccountRepository + PasscodeRepository + Send + Sync,
    M: Mailer + Send + Sync,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: String) -> AuthResult<()> {
        let email = Email::new(email).map_err(|e| AuthError::Validation(e.to_string()))?;

        let account = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::NotFound("No account with this email".into()))?;

        if account.is_verified {
            return Err(AuthError::Validation("Email is already verified".into()));
        }

        let mut stored = false;
        let mut passcode = Passcode::issue(account.account_id, self.config.passcode_length);
        for _ in 0..5 {
            if self.repo.put(&passcode).await? {
                stored = true;
                break;
            }
            passcode = Passcode::issue(account.account_id, self.config.passcode_length);
        }
        if !stored {
            return Err(AuthError::Internal(
                "could not generate a unique passcode".into(),
            ));
        }

        self.mailer
            .send(verification_email(&account, &passcode.code))
            .await?;

        tracing::info!(account_id = %account.account_id, "Passcode re-sent");
        Ok(())
    }
}
