//! Domain Layer
//!
//! Entities, value objects, and repository traits. No IO here.

pub mod entity;
pub mod repository;
pub mod value_object;
