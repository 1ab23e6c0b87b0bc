//! Social Entities

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, CommentId, PostId, ProfileId};

/// Public profile, 1:1 with an account
#[derive(Debug, Clone)]
pub struct Profile {
    pub profile_id: ProfileId,
    pub account_id: AccountId,
    pub bio: Option<String>,
    pub picture_url: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(
        account_id: AccountId,
        bio: Option<String>,
        picture_url: Option<String>,
        location: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            profile_id: ProfileId::new(),
            account_id,
            bio,
            picture_url,
            location,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. Returns false when nothing changed.
    pub fn apply(&mut self, patch: ProfilePatch) -> bool {
        let mut changed = false;
        if let Some(bio) = patch.bio {
            if self.bio.as_deref() != Some(bio.as_str()) {
                self.bio = Some(bio);
                changed = true;
            }
        }
        if let Some(picture_url) = patch.picture_url {
            if self.picture_url.as_deref() != Some(picture_url.as_str()) {
                self.picture_url = Some(picture_url);
                changed = true;
            }
        }
        if let Some(location) = patch.location {
            if self.location.as_deref() != Some(location.as_str()) {
                self.location = Some(location);
                changed = true;
            }
        }
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

/// Fields a profile update may touch; absent fields are left alone
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub bio: Option<String>,
    pub picture_url: Option<String>,
    pub location: Option<String>,
}

/// A post with free-form category tags
#[derive(Debug, Clone)]
pub struct Post {
    pub post_id: PostId,
    pub author_id: AccountId,
    pub content: String,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        author_id: AccountId,
        content: String,
        image_url: Option<String>,
        categories: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            post_id: PostId::new(),
            author_id,
            content,
            image_url,
            categories,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A comment on a post
#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: CommentId,
    pub account_id: AccountId,
    pub post_id: PostId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(account_id: AccountId, post_id: PostId, content: String) -> Self {
        Self {
            comment_id: CommentId::new(),
            account_id,
            post_id,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Directed follow edge: follower receives following's posts
#[derive(Debug, Clone)]
pub struct FollowEdge {
    pub follower: AccountId,
    pub following: AccountId,
    pub followed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_apply_reports_changes() {
        let mut profile = Profile::new(AccountId::new(), Some("old bio".into()), None, None);

        // Same value, no change
        assert!(!profile.apply(ProfilePatch {
            bio: Some("old bio".into()),
            ..Default::default()
        }));

        assert!(profile.apply(ProfilePatch {
            bio: Some("new bio".into()),
            location: Some("Berlin".into()),
            ..Default::default()
        }));
        assert_eq!(profile.bio.as_deref(), Some("new bio"));
        assert_eq!(profile.location.as_deref(), Some("Berlin"));

        // Empty patch, no change
        assert!(!profile.apply(ProfilePatch::default()));
    }
}
