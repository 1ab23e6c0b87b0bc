//! Email Verification Use Case
//!
//! Exchanges a submitted passcode for the verified flag. Submitting
//! the same valid code twice succeeds both times; the second response
//! reports the account was already verified.

use std::sync::Arc;

use crate::domain::repository::{AccountRepository, PasscodeRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Debug)]
pub struct VerifyEmailOutput {
    pub email: Email,
    pub already_verified: bool,
}

pub struct VerifyEmailUseCase<R> {
    repo: Arc<R>,
}

impl<R> VerifyEmailUseCase<R>
where
    R: AccountRepository + PasscodeRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, code: &str) -> AuthResult<VerifyEmailOutput> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::Validation("Passcode is required".into()));
        }

        let account_id = self
            .repo
            .find_account_by_code(code)
            .await?
            .ok_or_else(|| AuthError::NotFound("Invalid passcode".into()))?;

        // Conditional flip so two racing requests verify exactly once
        let newly_verified = self.repo.mark_verified(account_id).await?;

        let account = self
            .repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Account no longer exists".into()))?;

        if newly_verified {
            tracing::info!(account_id = %account_id, "Email verified");
        }

        Ok(VerifyEmailOutput {
            email: account.email,
            already_verified: !newly_verified,
        })
    }
}
