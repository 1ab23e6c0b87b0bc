//! Outbound Email Delivery
//!
//! The [`Mailer`] trait abstracts `(subject, body, recipient)` delivery so
//! the domain crates never touch SMTP directly. Three implementations:
//! - [`SmtpMailer`] - real delivery over SMTP (lettre)
//! - [`LogMailer`] - development fallback that logs instead of sending
//! - [`RecordingMailer`] - captures messages for assertions in tests

use std::sync::Mutex;
use std::time::Duration;

use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

/// Delivery failure. Transport errors are expected to fail loudly so the
/// caller can surface them as a distinct failure mode.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// A fully composed outbound message
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email delivery collaborator
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Deliver one message, failing loudly on transport errors
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError>;
}

// ============================================================================
// SMTP (lettre)
// ============================================================================

/// SMTP settings for [`SmtpMailer`]
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// From address, e.g. `"Social <no-reply@example.com>"`
    pub from: String,
}

/// Real SMTP delivery via lettre's pooled transport
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .credentials(Credentials::new(config.username, config.password))
            .port(config.port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        Ok(Self {
            transport,
            from: config.from,
        })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from.clone()))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|_| MailError::InvalidAddress(email.to.clone()))?)
            .subject(&email.subject)
            .header(lettre::message::header::ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|e| MailError::Build(e.to_string()))?;

        // lettre's SmtpTransport is blocking; keep it off the async workers
        let transport = self.transport.clone();
        let result = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
                Ok(())
            }
            Err(e) => Err(MailError::Transport(e.to_string())),
        }
    }
}

// ============================================================================
// Development fallback
// ============================================================================

/// Logs outbound mail instead of sending it. Used when no SMTP
/// configuration is present (local development).
#[derive(Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.body,
            "Outbound email (log-only mailer)"
        );
        Ok(())
    }
}

// ============================================================================
// Test double
// ============================================================================

/// Captures every message for later inspection
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    /// When set, every send fails with a transport error
    pub fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose sends always fail, for exercising delivery errors
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Messages delivered so far
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }

    /// The most recent message, if any
    pub fn last(&self) -> Option<OutboundEmail> {
        self.sent().last().cloned()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("recording mailer set to fail".into()));
        }
        self.sent.lock().expect("mailer lock poisoned").push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_mailer_captures() {
        let mailer = RecordingMailer::new();
        // Fully qualified: `send` also exists on the trait_variant base trait
        Mailer::send(
            &mailer,
            OutboundEmail {
                to: "alice@example.com".into(),
                subject: "Hello".into(),
                body: "World".into(),
            },
        )
        .await
        .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
        assert_eq!(sent[0].subject, "Hello");
    }

    #[tokio::test]
    async fn test_failing_mailer_errors() {
        let mailer = RecordingMailer::failing();
        let result = Mailer::send(
            &mailer,
            OutboundEmail {
                to: "alice@example.com".into(),
                subject: "Hello".into(),
                body: "World".into(),
            },
        )
        .await;
        assert!(matches!(result, Err(MailError::Transport(_))));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let mailer = LogMailer;
        assert!(
            Mailer::send(
                &mailer,
                OutboundEmail {
                    to: "alice@example.com".into(),
                    subject: "Hello".into(),
                    body: "World".into(),
                },
            )
            .await
            .is_ok()
        );
    }
}
