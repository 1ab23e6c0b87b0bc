//! Repository Traits

use kernel::id::{AccountId, CommentId, PostId, ProfileId};

use crate::domain::entity::{Comment, FollowEdge, Post, Profile};

/// Read-only view of the account store, owned by the auth module.
/// Keeps the social crate off the accounts table's write path.
#[trait_variant::make(AccountDirectory: Send)]
pub trait LocalAccountDirectory {
    async fn account_exists(&self, account_id: AccountId) -> Result<bool, sqlx::Error>;

    async fn find_account_id_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountId>, sqlx::Error>;

    async fn account_email(&self, account_id: AccountId) -> Result<Option<String>, sqlx::Error>;
}

#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    async fn create(&self, profile: &Profile) -> Result<(), sqlx::Error>;

    async fn find_by_id(&self, profile_id: ProfileId) -> Result<Option<Profile>, sqlx::Error>;

    async fn exists_for_account(&self, account_id: AccountId) -> Result<bool, sqlx::Error>;

    /// All profiles, oldest first
    async fn list(&self) -> Result<Vec<Profile>, sqlx::Error>;

    async fn update(&self, profile: &Profile) -> Result<(), sqlx::Error>;
}

#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn create(&self, post: &Post) -> Result<(), sqlx::Error>;

    async fn find_by_id(&self, post_id: PostId) -> Result<Option<Post>, sqlx::Error>;

    /// All posts, oldest first
    async fn list(&self) -> Result<Vec<Post>, sqlx::Error>;

    async fn update(&self, post: &Post) -> Result<(), sqlx::Error>;

    /// Returns false if no such post existed
    async fn delete(&self, post_id: PostId) -> Result<bool, sqlx::Error>;

    /// Whether a post with identical content and image already exists
    async fn exists_duplicate(
        &self,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<bool, sqlx::Error>;
}

#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<(), sqlx::Error>;

    async fn find_by_id(&self, comment_id: CommentId) -> Result<Option<Comment>, sqlx::Error>;

    /// All comments, oldest first
    async fn list(&self) -> Result<Vec<Comment>, sqlx::Error>;

    /// Returns false if no such comment existed
    async fn delete(&self, comment_id: CommentId) -> Result<bool, sqlx::Error>;
}

#[trait_variant::make(FollowRepository: Send)]
pub trait LocalFollowRepository {
    async fn create(&self, edge: &FollowEdge) -> Result<(), sqlx::Error>;

    async fn exists(
        &self,
        follower: AccountId,
        following: AccountId,
    ) -> Result<bool, sqlx::Error>;

    /// Returns false if the edge did not exist
    async fn delete(
        &self,
        follower: AccountId,
        following: AccountId,
    ) -> Result<bool, sqlx::Error>;

    /// Edges pointing at this account (who follows them)
    async fn followers_of(&self, account_id: AccountId) -> Result<Vec<FollowEdge>, sqlx::Error>;

    /// Edges leaving this account (who they follow)
    async fn following_of(&self, account_id: AccountId) -> Result<Vec<FollowEdge>, sqlx::Error>;
}
