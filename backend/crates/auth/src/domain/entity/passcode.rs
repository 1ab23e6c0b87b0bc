//! One-Time Passcode Entity

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::crypto;

/// An email verification passcode
///
/// One outstanding passcode per account; issuing a new one supersedes
/// the old. The code stays valid after verification so a duplicate
/// verify request is answered idempotently instead of failing.
#[derive(Debug, Clone)]
pub struct Passcode {
    pub account_id: AccountId,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl Passcode {
    /// Issue a fresh random passcode for the account
    pub fn issue(account_id: AccountId, length: usize) -> Self {
        Self {
            account_id,
            code: crypto::random_code(length),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_has_requested_length() {
        let passcode = Passcode::issue(AccountId::new(), 6);
        assert_eq!(passcode.code.len(), 6);
        assert!(passcode.code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_issue_varies() {
        let id = AccountId::new();
        let a = Passcode::issue(id, 6);
        let b = Passcode::issue(id, 6);
        let c = Passcode::issue(id, 6);
        assert!(!(a.code == b.code && b.code == c.code));
    }
}
