//! Account Entity

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::password::HashedPassword;

use crate::domain::value_object::Email;

/// A registered account
///
/// Identified by email (there is no separate username). Accounts start
/// unverified and cannot sign in until the email passcode is confirmed.
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: HashedPassword,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a fresh, unverified account
    pub fn new(
        email: Email,
        first_name: String,
        last_name: String,
        password_hash: HashedPassword,
    ) -> Self {
        let now = Utc::now();
        Self {
            account_id: AccountId::new(),
            email,
            first_name,
            last_name,
            password_hash,
            is_verified: false,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// "First Last" display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether sign-in is currently allowed
    pub fn can_login(&self) -> bool {
        self.is_active && self.is_verified
    }

    /// Record a successful sign-in
    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = Some(at);
        self.updated_at = at;
    }

    /// Replace the password hash (password reset)
    pub fn set_password(&mut self, hash: HashedPassword) {
        self.password_hash = hash;
        self.updated_at = Utc::now();
    }

    /// Flip the verification flag. Returns false if already verified.
    pub fn mark_verified(&mut self) -> bool {
        if self.is_verified {
            return false;
        }
        self.is_verified = true;
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use platform::password::ClearTextPassword;

    use super::*;

    fn sample_account() -> Account {
        let password = ClearTextPassword::new("a valid passphrase".into()).unwrap();
        Account::new(
            Email::new("alice@example.com").unwrap(),
            "Alice".into(),
            "Smith".into(),
            password.hash(None).unwrap(),
        )
    }

    #[test]
    fn test_new_account_is_unverified() {
        let account = sample_account();
        assert!(!account.is_verified);
        assert!(account.is_active);
        assert!(!account.can_login());
        assert!(account.last_login_at.is_none());
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample_account().full_name(), "Alice Smith");
    }

    #[test]
    fn test_mark_verified_flips_once() {
        let mut account = sample_account();
        assert!(account.mark_verified());
        assert!(account.is_verified);
        assert!(account.can_login());
        assert!(!account.mark_verified());
    }

    #[test]
    fn test_record_login() {
        let mut account = sample_account();
        let at = Utc::now();
        account.record_login(at);
        assert_eq!(account.last_login_at, Some(at));
    }
}
