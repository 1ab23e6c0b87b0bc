//! Registration Use Case
//!
//! Creates an unverified account and emails a one-time passcode.

use std::sync::Arc;

use platform::mailer::{Mailer, OutboundEmail};
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Account, Passcode};
use crate::domain::repository::{AccountRepository, PasscodeRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Registration input
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

/// Registration output, echoed back to the client
#[derive(Debug)]
pub struct RegisterOutput {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
}

/// Register a new account and dispatch its verification passcode
pub struct RegisterUseCase<R, M> {
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> RegisterUseCase<R, M>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let first_name = input.first_name.trim().to_string();
        let last_name = input.last_name.trim().to_string();

        if first_name.is_empty() {
            return Err(AuthError::Validation("First name is required".into()));
        }
        if last_name.is_empty() {
            return Err(AuthError::Validation("Last name is required".into()));
        }
        if input.password != input.password_confirm {
            return Err(AuthError::Validation("Passwords do not match".into()));
        }

        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let password = ClearTextPassword::new(input.password)?;

        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::Conflict(
                "An account with this email already exists".into(),
            ));
        }

        let password_hash = password.hash(self.config.pepper())?;
        let account = Account::new(email.clone(), first_name, last_name, password_hash);
        self.repo.create(&account).await?;

        let passcode = self.issue_passcode(&account).await?;

        self.mailer
            .send(verification_email(&account, &passcode.code))
            .await?;

        tracing::info!(account_id = %account.account_id, "Account registered");

        Ok(RegisterOutput {
            email,
            first_name: account.first_name,
            last_name: account.last_name,
        })
    }

    /// Issue a passcode, retrying on the (unlikely) global code collision
    async fn issue_passcode(&self, account: &Account) -> AuthResult<Passcode> {
        for _ in 0..5 {
            let passcode = Passcode::issue(account.account_id, self.config.passcode_length);
            if self.repo.put(&passcode).await? {
                return Ok(passcode);
            }
        }
        Err(AuthError::Internal(
            "could not generate a unique passcode".into(),
        ))
    }
}

/// Compose the verification email. The passcode is the last token of
/// the body, after a colon.
pub(crate) fn verification_email(account: &Account, code: &str) -> OutboundEmail {
    OutboundEmail {
        to: account.email.as_str().to_string(),
        subject: "One time passcode for email verification".to_string(),
        body: format!(
            "Hi {}, thanks for signing up. Please verify your email with this one time passcode: {}",
            account.first_name, code
        ),
    }
}
