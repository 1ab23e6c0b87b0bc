//! Email Address Value Object

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Email validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email cannot be empty")]
    Empty,

    #[error("Email exceeds maximum length of {max} characters")]
    TooLong { max: usize },

    #[error("Enter a valid email address")]
    InvalidFormat,
}

/// Maximum total length (RFC 5321)
const MAX_EMAIL_LENGTH: usize = 254;

/// A validated, lowercased email address
///
/// Validation is deliberately permissive: one `@`, a non-empty local
/// part, and a domain containing at least one dot. Deliverability is
/// the mailer's problem, not the type's.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parse and normalize (trim + lowercase) an email address
    pub fn new(raw: impl Into<String>) -> Result<Self, EmailError> {
        let normalized = raw.into().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }

        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(EmailError::TooLong {
                max: MAX_EMAIL_LENGTH,
            });
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(EmailError::InvalidFormat);
        };

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(EmailError::InvalidFormat);
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::InvalidFormat);
        }

        if normalized.chars().any(char::is_whitespace) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(normalized))
    }

    /// Get the normalized address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        let email = Email::new("alice@example.com").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_normalization() {
        let email = Email::new("  Alice@Example.COM  ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Email::new(""), Err(EmailError::Empty));
        assert_eq!(Email::new("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "no-at-sign",
            "@example.com",
            "alice@",
            "alice@nodot",
            "alice@.com",
            "alice@example.com.",
            "ali ce@example.com",
            "alice@ex@ample.com",
        ] {
            assert_eq!(Email::new(bad), Err(EmailError::InvalidFormat), "{bad}");
        }
    }

    #[test]
    fn test_rejects_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(Email::new(long), Err(EmailError::TooLong { .. })));
    }

    #[test]
    fn test_serde_roundtrip() {
        let email = Email::new("alice@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"alice@example.com\"");
        let back: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(back, email);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        assert!(serde_json::from_str::<Email>("\"not-an-email\"").is_err());
    }
}
