//! Follow Service
//!
//! Directed edges. No self-follow, no duplicate edge.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::AccountId;

use crate::domain::entity::FollowEdge;
use crate::domain::repository::{AccountDirectory, FollowRepository};
use crate::error::{SocialError, SocialResult};

pub struct FollowService<R> {
    repo: Arc<R>,
}

impl<R> FollowService<R>
where
    R: FollowRepository + AccountDirectory + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Follow `target`. Returns the target's email for the confirmation
    /// message.
    pub async fn follow(&self, follower: AccountId, target: AccountId) -> SocialResult<String> {
        let target_email = self
            .repo
            .account_email(target)
            .await?
            .ok_or_else(|| SocialError::NotFound("User not found".into()))?;

        if follower == target {
            return Err(SocialError::Validation("You cannot follow yourself".into()));
        }

        if self.repo.exists(follower, target).await? {
            return Err(SocialError::Conflict(
                "You are already following this user".into(),
            ));
        }

        FollowRepository::create(
            &*self.repo,
            &FollowEdge {
                follower,
                following: target,
                followed_at: Utc::now(),
            },
        )
        .await?;

        tracing::info!(follower = %follower, following = %target, "Follow edge created");
        Ok(target_email)
    }

    /// Unfollow `target`. Returns the target's email for the
    /// confirmation message.
    pub async fn unfollow(&self, follower: AccountId, target: AccountId) -> SocialResult<String> {
        let target_email = self
            .repo
            .account_email(target)
            .await?
            .ok_or_else(|| SocialError::NotFound("User not found".into()))?;

        if !self.repo.delete(follower, target).await? {
            return Err(SocialError::Validation(
                "You are not following this user".into(),
            ));
        }

        tracing::info!(follower = %follower, following = %target, "Follow edge removed");
        Ok(target_email)
    }

    /// Who follows this account
    pub async fn followers(&self, account_id: AccountId) -> SocialResult<Vec<FollowEdge>> {
        Ok(self.repo.followers_of(account_id).await?)
    }

    /// Who this account follows
    pub async fn following(&self, account_id: AccountId) -> SocialResult<Vec<FollowEdge>> {
        Ok(self.repo.following_of(account_id).await?)
    }
}
