//! Request / Response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{Comment, FollowEdge, Post, Profile};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub email: String,
    pub bio: Option<String>,
    pub picture_url: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub picture_url: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile_id: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub picture_url: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn from_profile(profile: Profile, email: Option<String>) -> Self {
        Self {
            profile_id: profile.profile_id.to_string(),
            email,
            bio: profile.bio,
            picture_url: profile.picture_url,
            location: profile.location,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub content: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub post_id: String,
    pub author_id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            post_id: post.post_id.to_string(),
            author_id: post.author_id.to_string(),
            content: post.content,
            image_url: post.image_url,
            categories: post.categories,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub comment_id: String,
    pub account_id: String,
    pub post_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            comment_id: comment.comment_id.to_string(),
            account_id: comment.account_id.to_string(),
            post_id: comment.post_id.to_string(),
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdgeResponse {
    pub follower: String,
    pub following: String,
    pub followed_at: DateTime<Utc>,
}

impl From<FollowEdge> for FollowEdgeResponse {
    fn from(edge: FollowEdge) -> Self {
        Self {
            follower: edge.follower.to_string(),
            following: edge.following.to_string(),
            followed_at: edge.followed_at,
        }
    }
}

/// Generic `{ "detail": ... }` envelope for confirmations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
