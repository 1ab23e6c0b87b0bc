//! Comment Service

use std::sync::Arc;

use kernel::id::{AccountId, CommentId, PostId};

use crate::domain::entity::Comment;
use crate::domain::repository::{CommentRepository, PostRepository};
use crate::error::{SocialError, SocialResult};

pub struct CommentService<R> {
    repo: Arc<R>,
}

impl<R> CommentService<R>
where
    R: CommentRepository + PostRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        account_id: AccountId,
        post_id: PostId,
        content: String,
    ) -> SocialResult<Comment> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(SocialError::Validation(
                "Comment content is required".into(),
            ));
        }

        if PostRepository::find_by_id(&*self.repo, post_id).await?.is_none() {
            return Err(SocialError::NotFound("Post not found".into()));
        }

        let comment = Comment::new(account_id, post_id, content);
        CommentRepository::create(&*self.repo, &comment).await?;

        tracing::info!(comment_id = %comment.comment_id, post_id = %post_id, "Comment posted");
        Ok(comment)
    }

    pub async fn get(&self, comment_id: CommentId) -> SocialResult<Comment> {
        CommentRepository::find_by_id(&*self.repo, comment_id)
            .await?
            .ok_or_else(|| SocialError::NotFound("Comment not found".into()))
    }

    pub async fn list(&self) -> SocialResult<Vec<Comment>> {
        Ok(CommentRepository::list(&*self.repo).await?)
    }

    pub async fn delete(&self, comment_id: CommentId) -> SocialResult<()> {
        if !CommentRepository::delete(&*self.repo, comment_id).await? {
            return Err(SocialError::NotFound("Comment not found".into()));
        }
        Ok(())
    }
}
