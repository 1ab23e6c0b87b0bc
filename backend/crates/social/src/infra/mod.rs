//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::MemSocialRepository;
pub use postgres::PgSocialRepository;
