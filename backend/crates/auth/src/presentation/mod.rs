//! Presentation Layer
//!
//! HTTP DTOs, handlers, middleware, and router assembly.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
