//! Auth Configuration

use chrono::Duration;

use platform::crypto;

/// Runtime configuration for the auth module
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key for JWT signing and reset tickets
    pub jwt_secret: [u8; 32],
    /// `iss` claim stamped into every token
    pub issuer: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
    /// Password reset ticket lifetime
    pub reset_ttl: Duration,
    /// Length of emailed verification passcodes
    pub passcode_length: usize,
    /// Optional application-wide password pepper
    pub password_pepper: Option<Vec<u8>>,
    /// Base URL for links embedded in emails
    pub frontend_base_url: String,
}

impl AuthConfig {
    /// Config with a freshly generated random secret
    pub fn with_random_secret() -> Self {
        let bytes = crypto::random_bytes(32);
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes);
        Self {
            jwt_secret: secret,
            ..Self::default()
        }
    }

    /// Development preset: random secret, localhost frontend
    pub fn development() -> Self {
        Self {
            frontend_base_url: "http://localhost:3000".to_string(),
            ..Self::with_random_secret()
        }
    }

    /// Pepper as a byte slice, if configured
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: [0u8; 32],
            issuer: "social-backend".to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
            reset_ttl: Duration::hours(1),
            passcode_length: 6,
            password_pepper: None,
            frontend_base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls() {
        let config = AuthConfig::default();
        assert_eq!(config.access_ttl, Duration::minutes(15));
        assert_eq!(config.refresh_ttl, Duration::days(7));
        assert_eq!(config.reset_ttl, Duration::hours(1));
        assert_eq!(config.passcode_length, 6);
    }

    #[test]
    fn test_random_secret_is_random() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.jwt_secret, b.jwt_secret);
    }
}
