//! Application Layer

pub mod comment_service;
pub mod follow_service;
pub mod post_service;
pub mod profile_service;

pub use comment_service::CommentService;
pub use follow_service::FollowService;
pub use post_service::PostService;
pub use profile_service::{ProfileService, ProfileUpdateOutcome};
