//! Profile Service
//!
//! Profiles are created by email (pre-dating the authenticated post
//! surface) and capped at one per account.

use std::sync::Arc;

use kernel::id::ProfileId;

use crate::domain::entity::{Profile, ProfilePatch};
use crate::domain::repository::{AccountDirectory, ProfileRepository};
use crate::error::{SocialError, SocialResult};

/// Result of a partial update
#[derive(Debug)]
pub enum ProfileUpdateOutcome {
    Updated(Profile),
    /// Every supplied field already held that value
    NoChanges,
}

pub struct ProfileService<R> {
    repo: Arc<R>,
}

impl<R> ProfileService<R>
where
    R: ProfileRepository + AccountDirectory + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, email: &str, patch: ProfilePatch) -> SocialResult<Profile> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SocialError::Validation("Email is required".into()));
        }

        let account_id = self
            .repo
            .find_account_id_by_email(email)
            .await?
            .ok_or_else(|| {
                SocialError::NotFound("No account is associated with this email".into())
            })?;

        if self.repo.exists_for_account(account_id).await? {
            return Err(SocialError::Conflict(
                "A profile for this account already exists".into(),
            ));
        }

        let profile = Profile::new(account_id, patch.bio, patch.picture_url, patch.location);
        ProfileRepository::create(&*self.repo, &profile).await?;

        tracing::info!(profile_id = %profile.profile_id, "Profile created");
        Ok(profile)
    }

    pub async fn get(&self, profile_id: ProfileId) -> SocialResult<Profile> {
        self.repo
            .find_by_id(profile_id)
            .await?
            .ok_or_else(|| SocialError::NotFound("Profile not found".into()))
    }

    pub async fn list(&self) -> SocialResult<Vec<Profile>> {
        Ok(self.repo.list().await?)
    }

    pub async fn update(
        &self,
        profile_id: ProfileId,
        patch: ProfilePatch,
    ) -> SocialResult<ProfileUpdateOutcome> {
        let mut profile = self.get(profile_id).await?;

        if !profile.apply(patch) {
            return Ok(ProfileUpdateOutcome::NoChanges);
        }

        self.repo.update(&profile).await?;
        Ok(ProfileUpdateOutcome::Updated(profile))
    }

    /// Owner's email, for display alongside the profile
    pub async fn owner_email(&self, profile: &Profile) -> SocialResult<Option<String>> {
        Ok(self.repo.account_email(profile.account_id).await?)
    }
}
