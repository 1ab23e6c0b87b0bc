//! Social Graph Backend Module
//!
//! Profiles, posts with categories, comments, and the follow graph.
//! Same clean-architecture layering as the auth crate:
//! - `domain/` - Entities and repository traits
//! - `application/` - Services with the business rules
//! - `infra/` - Postgres and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Write operations require a bearer token issued by the auth module;
//! reads are public.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use error::{SocialError, SocialResult};
pub use infra::memory::MemSocialRepository;
pub use infra::postgres::PgSocialRepository;
pub use presentation::router::social_router;

#[cfg(test)]
mod tests;
