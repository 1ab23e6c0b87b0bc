//! Infrastructure Layer
//!
//! Repository implementations: Postgres for production, in-memory for
//! tests and local experimentation.

pub mod memory;
pub mod postgres;

pub use memory::MemAuthRepository;
pub use postgres::PgAuthRepository;
