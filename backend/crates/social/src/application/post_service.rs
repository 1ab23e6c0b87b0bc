//! Post Service
//!
//! Duplicate detection: two posts with identical content and image are
//! assumed to be an accidental double submission and rejected.

use std::sync::Arc;

use kernel::id::{AccountId, PostId};

use crate::domain::entity::Post;
use crate::domain::repository::PostRepository;
use crate::error::{SocialError, SocialResult};

#[derive(Debug, Default)]
pub struct PostPatch {
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub categories: Option<Vec<String>>,
}

pub struct PostService<R> {
    repo: Arc<R>,
}

impl<R> PostService<R>
where
    R: PostRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        author_id: AccountId,
        content: String,
        image_url: Option<String>,
        categories: Vec<String>,
    ) -> SocialResult<Post> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(SocialError::Validation("Post content is required".into()));
        }

        if self
            .repo
            .exists_duplicate(&content, image_url.as_deref())
            .await?
        {
            return Err(SocialError::Conflict(
                "A post with these details already exists".into(),
            ));
        }

        let categories = normalize_categories(categories);
        let post = Post::new(author_id, content, image_url, categories);
        self.repo.create(&post).await?;

        tracing::info!(post_id = %post.post_id, author_id = %author_id, "Post created");
        Ok(post)
    }

    pub async fn get(&self, post_id: PostId) -> SocialResult<Post> {
        self.repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| SocialError::NotFound("Post not found".into()))
    }

    pub async fn list(&self) -> SocialResult<Vec<Post>> {
        Ok(self.repo.list().await?)
    }

    pub async fn update(&self, post_id: PostId, patch: PostPatch) -> SocialResult<Post> {
        let mut post = self.get(post_id).await?;

        if let Some(content) = patch.content {
            let content = content.trim().to_string();
            if content.is_empty() {
                return Err(SocialError::Validation("Post content is required".into()));
            }
            post.content = content;
        }
        if let Some(image_url) = patch.image_url {
            post.image_url = Some(image_url);
        }
        if let Some(categories) = patch.categories {
            post.categories = normalize_categories(categories);
        }
        post.updated_at = chrono::Utc::now();

        self.repo.update(&post).await?;
        Ok(post)
    }

    pub async fn delete(&self, post_id: PostId) -> SocialResult<()> {
        if !self.repo.delete(post_id).await? {
            return Err(SocialError::NotFound("Post not found".into()));
        }
        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }
}

/// Trim, drop empties, dedupe while keeping first-seen order
fn normalize_categories(categories: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for category in categories {
        let category = category.trim().to_string();
        if !category.is_empty() && !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_categories() {
        let input = vec![
            " rust ".to_string(),
            "".to_string(),
            "rust".to_string(),
            "web".to_string(),
        ];
        assert_eq!(normalize_categories(input), vec!["rust", "web"]);
    }
}
