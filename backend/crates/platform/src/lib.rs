//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random codes, HMAC, Base64)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Outbound email delivery (SMTP via lettre)

pub mod crypto;
pub mod mailer;
pub mod password;
