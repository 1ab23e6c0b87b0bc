//! Repository Traits
//!
//! Persistence boundaries for the auth domain. Implemented by
//! `infra::postgres` for production and `infra::memory` for tests.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::entity::{Account, Passcode};
use crate::domain::value_object::Email;

/// Account persistence
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account
    async fn create(&self, account: &Account) -> Result<(), sqlx::Error>;

    /// Look up by primary key
    async fn find_by_id(&self, account_id: AccountId) -> Result<Option<Account>, sqlx::Error>;

    /// Look up by normalized email
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, sqlx::Error>;

    /// Whether an account with this email exists
    async fn exists_by_email(&self, email: &Email) -> Result<bool, sqlx::Error>;

    /// Persist mutated fields (password hash, last login, timestamps)
    async fn update(&self, account: &Account) -> Result<(), sqlx::Error>;

    /// Atomically flip `is_verified` from false to true.
    ///
    /// Returns false when the account was already verified, so callers
    /// can distinguish a first verification from a repeat.
    async fn mark_verified(&self, account_id: AccountId) -> Result<bool, sqlx::Error>;
}

/// Passcode persistence (one outstanding code per account)
#[trait_variant::make(PasscodeRepository: Send)]
pub trait LocalPasscodeRepository {
    /// Store the passcode, replacing any earlier one for the same
    /// account. Returns false if the code string collides with another
    /// account's outstanding code (codes are globally unique).
    async fn put(&self, passcode: &Passcode) -> Result<bool, sqlx::Error>;

    /// Resolve a submitted code to the account it was issued for
    async fn find_account_by_code(&self, code: &str) -> Result<Option<AccountId>, sqlx::Error>;
}

/// Refresh-token denylist ("blacklist" on sign-out)
#[trait_variant::make(TokenDenylistRepository: Send)]
pub trait LocalTokenDenylistRepository {
    /// Deny a token by its jti. Returns false if it was already denied.
    async fn deny(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<bool, sqlx::Error>;

    /// Drop entries whose tokens have expired anyway. Returns the
    /// number removed.
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error>;
}
