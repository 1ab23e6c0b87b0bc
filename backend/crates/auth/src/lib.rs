//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations (Postgres + in-memory)
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Registration with email verification via one-time passcodes
//! - Login issuing paired access/refresh JWTs (HS256)
//! - Logout via refresh-token denylist ("blacklist")
//! - Password reset with derived, never-persisted tickets
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Authentication failures return one generic message (no account
//!   enumeration)
//! - Verification flag flips false -> true exactly once (conditional
//!   update, safe under concurrent verification attempts)
//! - Reset tickets are HMAC-bound to the current password hash, so a
//!   successful reset consumes the ticket

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::MemAuthRepository;
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
