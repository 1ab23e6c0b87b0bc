//! In-Memory Repository Implementation
//!
//! Backs the test suite. Accounts are seeded directly through
//! [`MemSocialRepository::add_account`], standing in for the auth
//! module's account store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kernel::id::{AccountId, CommentId, PostId, ProfileId};
use uuid::Uuid;

use crate::domain::entity::{Comment, FollowEdge, Post, Profile};
use crate::domain::repository::{
    AccountDirectory, CommentRepository, FollowRepository, PostRepository, ProfileRepository,
};

#[derive(Default)]
struct State {
    /// account -> email
    accounts: HashMap<Uuid, String>,
    profiles: Vec<Profile>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<FollowEdge>,
}

#[derive(Clone, Default)]
pub struct MemSocialRepository {
    state: Arc<Mutex<State>>,
}

impl MemSocialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account into the directory
    pub fn add_account(&self, account_id: AccountId, email: &str) {
        self.lock()
            .accounts
            .insert(account_id.into_uuid(), email.to_lowercase());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("repository lock poisoned")
    }
}

impl AccountDirectory for MemSocialRepository {
    async fn account_exists(&self, account_id: AccountId) -> Result<bool, sqlx::Error> {
        Ok(self.lock().accounts.contains_key(account_id.as_uuid()))
    }

    async fn find_account_id_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountId>, sqlx::Error> {
        let email = email.to_lowercase();
        Ok(self
            .lock()
            .accounts
            .iter()
            .find(|(_, e)| **e == email)
            .map(|(uuid, _)| AccountId::from_uuid(*uuid)))
    }

    async fn account_email(&self, account_id: AccountId) -> Result<Option<String>, sqlx::Error> {
        Ok(self.lock().accounts.get(account_id.as_uuid()).cloned())
    }
}

impl ProfileRepository for MemSocialRepository {
    async fn create(&self, profile: &Profile) -> Result<(), sqlx::Error> {
        self.lock().profiles.push(profile.clone());
        Ok(())
    }

    async fn find_by_id(&self, profile_id: ProfileId) -> Result<Option<Profile>, sqlx::Error> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .find(|p| p.profile_id == profile_id)
            .cloned())
    }

    async fn exists_for_account(&self, account_id: AccountId) -> Result<bool, sqlx::Error> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .any(|p| p.account_id == account_id))
    }

    async fn list(&self) -> Result<Vec<Profile>, sqlx::Error> {
        Ok(self.lock().profiles.clone())
    }

    async fn update(&self, profile: &Profile) -> Result<(), sqlx::Error> {
        let mut state = self.lock();
        if let Some(existing) = state
            .profiles
            .iter_mut()
            .find(|p| p.profile_id == profile.profile_id)
        {
            *existing = profile.clone();
        }
        Ok(())
    }
}

impl PostRepository for MemSocialRepository {
    async fn create(&self, post: &Post) -> Result<(), sqlx::Error> {
        self.lock().posts.push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, post_id: PostId) -> Result<Option<Post>, sqlx::Error> {
        Ok(self
            .lock()
            .posts
            .iter()
            .find(|p| p.post_id == post_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, sqlx::Error> {
        Ok(self.lock().posts.clone())
    }

    async fn update(&self, post: &Post) -> Result<(), sqlx::Error> {
        let mut state = self.lock();
        if let Some(existing) = state.posts.iter_mut().find(|p| p.post_id == post.post_id) {
            *existing = post.clone();
        }
        Ok(())
    }

    async fn delete(&self, post_id: PostId) -> Result<bool, sqlx::Error> {
        let mut state = self.lock();
        let before = state.posts.len();
        state.posts.retain(|p| p.post_id != post_id);
        Ok(state.posts.len() < before)
    }

    async fn exists_duplicate(
        &self,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        Ok(self
            .lock()
            .posts
            .iter()
            .any(|p| p.content == content && p.image_url.as_deref() == image_url))
    }
}

impl CommentRepository for MemSocialRepository {
    async fn create(&self, comment: &Comment) -> Result<(), sqlx::Error> {
        self.lock().comments.push(comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, comment_id: CommentId) -> Result<Option<Comment>, sqlx::Error> {
        Ok(self
            .lock()
            .comments
            .iter()
            .find(|c| c.comment_id == comment_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Comment>, sqlx::Error> {
        Ok(self.lock().comments.clone())
    }

    async fn delete(&self, comment_id: CommentId) -> Result<bool, sqlx::Error> {
        let mut state = self.lock();
        let before = state.comments.len();
        state.comments.retain(|c| c.comment_id != comment_id);
        Ok(state.comments.len() < before)
    }
}

impl FollowRepository for MemSocialRepository {
    async fn create(&self, edge: &FollowEdge) -> Result<(), sqlx::Error> {
        self.lock().follows.push(edge.clone());
        Ok(())
    }

    async fn exists(
        &self,
        follower: AccountId,
        following: AccountId,
    ) -> Result<bool, sqlx::Error> {
        Ok(self
            .lock()
            .follows
            .iter()
            .any(|e| e.follower == follower && e.following == following))
    }

    async fn delete(
        &self,
        follower: AccountId,
        following: AccountId,
    ) -> Result<bool, sqlx::Error> {
        let mut state = self.lock();
        let before = state.follows.len();
        state
            .follows
            .retain(|e| !(e.follower == follower && e.following == following));
        Ok(state.follows.len() < before)
    }

    async fn followers_of(&self, account_id: AccountId) -> Result<Vec<FollowEdge>, sqlx::Error> {
        Ok(self
            .lock()
            .follows
            .iter()
            .filter(|e| e.following == account_id)
            .cloned()
            .collect())
    }

    async fn following_of(&self, account_id: AccountId) -> Result<Vec<FollowEdge>, sqlx::Error> {
        Ok(self
            .lock()
            .follows
            .iter()
            .filter(|e| e.follower == account_id)
            .cloned()
            .collect())
    }
}
