//! Password Reset Use Cases
//!
//! Three steps: request (emails a link), confirm (read-only ticket
//! check for the frontend), set-new-password (rotates the hash).
//!
//! Reset tickets are derived, never stored. The HMAC covers the
//! current password hash, so changing the password invalidates every
//! outstanding ticket for the account. The uid is the account id in
//! URL-safe base64, the ticket a hex timestamp plus signature.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::crypto;
use platform::mailer::{Mailer, OutboundEmail};
use platform::password::ClearTextPassword;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Encode an account id for use in a reset URL
pub fn encode_uid(account_id: AccountId) -> String {
    crypto::to_base64_url(account_id.as_uuid().as_bytes())
}

/// Decode a reset-URL uid back to an account id
pub fn decode_uid(uid: &str) -> Option<AccountId> {
    let bytes = crypto::from_base64_url(uid).ok()?;
    let uuid = Uuid::from_slice(&bytes).ok()?;
    Some(AccountId::from_uuid(uuid))
}

/// Derive a reset ticket bound to the account's current password hash
pub fn make_reset_token(config: &AuthConfig, account: &Account) -> String {
    make_reset_token_at(config, account, Utc::now())
}

/// Same, at an explicit issue time. Exposed for expiry tests.
pub(crate) fn make_reset_token_at(
    config: &AuthConfig,
    account: &Account,
    issued_at: DateTime<Utc>,
) -> String {
    let ts = issued_at.timestamp();
    let sig = reset_signature(config, account, ts);
    format!("{ts:x}-{}", crypto::to_base64_url(&sig))
}

/// Check a ticket against the account's current state
pub fn check_reset_token(config: &AuthConfig, account: &Account, token: &str) -> bool {
    let Some((ts_hex, sig_b64)) = token.split_once('-') else {
        return false;
    };
    let Ok(ts) = i64::from_str_radix(ts_hex, 16) else {
        return false;
    };
    let Some(issued_at) = DateTime::from_timestamp(ts, 0) else {
        return false;
    };

    let now = Utc::now();
    if issued_at > now || now - issued_at > config.reset_ttl {
        return false;
    }

    let Ok(presented) = crypto::from_base64_url(sig_b64) else {
        return false;
    };
    let expected = reset_signature(config, account, ts);
    crypto::constant_time_eq(&presented, &expected)
}

fn reset_signature(config: &AuthConfig, account: &Account, ts: i64) -> [u8; 32] {
    let material = format!(
        "reset:{}:{}:{}",
        account.account_id,
        ts,
        account.password_hash.as_phc_string()
    );
    crypto::hmac_sha256(&config.jwt_secret, material.as_bytes())
}

// ============================================================================
// Request
// ============================================================================

#[derive(Debug)]
pub struct ResetRequestOutput {
    pub uid: String,
    pub token: String,
}

/// Email a reset link to an existing account
pub struct RequestPasswordResetUseCase<R, M> {
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> RequestPasswordResetUseCase<R, M>
where
    R: AccountRepository + Send + Sync,
    M: Mailer + Send + Sync,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: String) -> AuthResult<ResetRequestOutput> {
        let email = Email::new(email).map_err(|e| AuthError::Validation(e.to_string()))?;

        let account = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                AuthError::Validation("User with this email does not exist.".into())
            })?;

        let uid = encode_uid(account.account_id);
        let token = make_reset_token(&self.config, &account);

        let link = format!(
            "{}/password-reset-confirm/{}/{}",
            self.config.frontend_base_url, uid, token
        );

        self.mailer
            .send(OutboundEmail {
                to: account.email.as_str().to_string(),
                subject: "Reset your password".to_string(),
                body: format!(
                    "Hi {}, use the link below to reset your password:\n{}",
                    account.first_name, link
                ),
            })
            .await?;

        tracing::info!(account_id = %account.account_id, "Password reset requested");

        Ok(ResetRequestOutput { uid, token })
    }
}

// ============================================================================
// Confirm (read-only)
// ============================================================================

#[derive(Debug)]
pub struct ResetConfirmOutput {
    pub uid: String,
    pub token: String,
}

/// Validate a reset link without consuming it
pub struct ConfirmResetTokenUseCase<R> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> ConfirmResetTokenUseCase<R>
where
    R: AccountRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, uid: &str, token: &str) -> AuthResult<ResetConfirmOutput> {
        let account_id = decode_uid(uid)
            .ok_or_else(|| AuthError::Unauthorized("Token is not valid".into()))?;

        let account = self
            .repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Account not found".into()))?;

        if !check_reset_token(&self.config, &account, token) {
            return Err(AuthError::Unauthorized(
                "Token is not valid, please request a new one".into(),
            ));
        }

        Ok(ResetConfirmOutput {
            uid: uid.to_string(),
            token: token.to_string(),
        })
    }
}

// ============================================================================
// Set new password
// ============================================================================

#[derive(Debug)]
pub struct SetNewPasswordInput {
    pub uid: String,
    pub token: String,
    pub password: String,
    pub password_confirm: String,
}

/// Rotate the password hash, consuming the ticket
pub struct SetNewPasswordUseCase<R> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SetNewPasswordUseCase<R>
where
    R: AccountRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SetNewPasswordInput) -> AuthResult<()> {
        if input.password != input.password_confirm {
            return Err(AuthError::Validation("Passwords do not match".into()));
        }

        let account_id = decode_uid(&input.uid)
            .ok_or_else(|| AuthError::Unauthorized("The reset link is invalid".into()))?;

        let mut account = self
            .repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("Account not found".into()))?;

        if !check_reset_token(&self.config, &account, &input.token) {
            return Err(AuthError::Unauthorized("The reset link is invalid".into()));
        }

        let password = ClearTextPassword::new(input.password)?;
        let new_hash = password.hash(self.config.pepper())?;

        // New hash means a new HMAC input, so this ticket cannot be
        // replayed after the update lands
        account.set_password(new_hash);
        self.repo.update(&account).await?;

        tracing::info!(account_id = %account.account_id, "Password reset completed");
        Ok(())
    }
}
