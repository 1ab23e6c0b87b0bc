//! Postgres Repository Implementation
//!
//! Categories are stored as a text array on the posts row; everything
//! else is a plain table per entity.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, CommentId, PostId, ProfileId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{Comment, FollowEdge, Post, Profile};
use crate::domain::repository::{
    AccountDirectory, CommentRepository, FollowRepository, PostRepository, ProfileRepository,
};

#[derive(Clone)]
pub struct PgSocialRepository {
    pool: PgPool,
}

impl PgSocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    profile_id: Uuid,
    account_id: Uuid,
    bio: Option<String>,
    picture_url: Option<String>,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            profile_id: ProfileId::from_uuid(row.profile_id),
            account_id: AccountId::from_uuid(row.account_id),
            bio: row.bio,
            picture_url: row.picture_url,
            location: row.location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    author_id: Uuid,
    content: String,
    image_url: Option<String>,
    categories: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            post_id: PostId::from_uuid(row.post_id),
            author_id: AccountId::from_uuid(row.author_id),
            content: row.content,
            image_url: row.image_url,
            categories: row.categories,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    account_id: Uuid,
    post_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            comment_id: CommentId::from_uuid(row.comment_id),
            account_id: AccountId::from_uuid(row.account_id),
            post_id: PostId::from_uuid(row.post_id),
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FollowRow {
    follower: Uuid,
    following: Uuid,
    followed_at: DateTime<Utc>,
}

impl From<FollowRow> for FollowEdge {
    fn from(row: FollowRow) -> Self {
        FollowEdge {
            follower: AccountId::from_uuid(row.follower),
            following: AccountId::from_uuid(row.following),
            followed_at: row.followed_at,
        }
    }
}

impl AccountDirectory for PgSocialRepository {
    async fn account_exists(&self, account_id: AccountId) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE account_id = $1)")
                .bind(account_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.0)
    }

    async fn find_account_id_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountId>, sqlx::Error> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT account_id FROM accounts WHERE email = $1")
                .bind(email.to_lowercase())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(uuid,)| AccountId::from_uuid(uuid)))
    }

    async fn account_email(&self, account_id: AccountId) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT email FROM accounts WHERE account_id = $1")
                .bind(account_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(email,)| email))
    }
}

impl ProfileRepository for PgSocialRepository {
    async fn create(&self, profile: &Profile) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                profile_id, account_id, bio, picture_url, location, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(profile.profile_id.as_uuid())
        .bind(profile.account_id.as_uuid())
        .bind(&profile.bio)
        .bind(&profile.picture_url)
        .bind(&profile.location)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, profile_id: ProfileId) -> Result<Option<Profile>, sqlx::Error> {
        let row: Option<ProfileRow> =
            sqlx::query_as("SELECT * FROM profiles WHERE profile_id = $1")
                .bind(profile_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Profile::from))
    }

    async fn exists_for_account(&self, account_id: AccountId) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM profiles WHERE account_id = $1)")
                .bind(account_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.0)
    }

    async fn list(&self) -> Result<Vec<Profile>, sqlx::Error> {
        let rows: Vec<ProfileRow> =
            sqlx::query_as("SELECT * FROM profiles ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn update(&self, profile: &Profile) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET bio = $2, picture_url = $3, location = $4, updated_at = $5
            WHERE profile_id = $1
            "#,
        )
        .bind(profile.profile_id.as_uuid())
        .bind(&profile.bio)
        .bind(&profile.picture_url)
        .bind(&profile.location)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl PostRepository for PgSocialRepository {
    async fn create(&self, post: &Post) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                post_id, author_id, content, image_url, categories, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.author_id.as_uuid())
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.categories)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, post_id: PostId) -> Result<Option<Post>, sqlx::Error> {
        let row: Option<PostRow> = sqlx::query_as("SELECT * FROM posts WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Post::from))
    }

    async fn list(&self) -> Result<Vec<Post>, sqlx::Error> {
        let rows: Vec<PostRow> = sqlx::query_as("SELECT * FROM posts ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn update(&self, post: &Post) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE posts
            SET content = $2, image_url = $3, categories = $4, updated_at = $5
            WHERE post_id = $1
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.categories)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, post_id: PostId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn exists_duplicate(
        &self,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM posts
                WHERE content = $1 AND image_url IS NOT DISTINCT FROM $2
            )
            "#,
        )
        .bind(content)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }
}

impl CommentRepository for PgSocialRepository {
    async fn create(&self, comment: &Comment) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO comments (comment_id, account_id, post_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.account_id.as_uuid())
        .bind(comment.post_id.as_uuid())
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, comment_id: CommentId) -> Result<Option<Comment>, sqlx::Error> {
        let row: Option<CommentRow> =
            sqlx::query_as("SELECT * FROM comments WHERE comment_id = $1")
                .bind(comment_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Comment::from))
    }

    async fn list(&self) -> Result<Vec<Comment>, sqlx::Error> {
        let rows: Vec<CommentRow> =
            sqlx::query_as("SELECT * FROM comments ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn delete(&self, comment_id: CommentId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

impl FollowRepository for PgSocialRepository {
    async fn create(&self, edge: &FollowEdge) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO follows (follower, following, followed_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(edge.follower.as_uuid())
        .bind(edge.following.as_uuid())
        .bind(edge.followed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn exists(
        &self,
        follower: AccountId,
        following: AccountId,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower = $1 AND following = $2)",
        )
        .bind(follower.as_uuid())
        .bind(following.as_uuid())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    async fn delete(
        &self,
        follower: AccountId,
        following: AccountId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM follows WHERE follower = $1 AND following = $2")
            .bind(follower.as_uuid())
            .bind(following.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn followers_of(&self, account_id: AccountId) -> Result<Vec<FollowEdge>, sqlx::Error> {
        let rows: Vec<FollowRow> =
            sqlx::query_as("SELECT * FROM follows WHERE following = $1 ORDER BY followed_at")
                .bind(account_id.as_uuid())
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(FollowEdge::from).collect())
    }

    async fn following_of(&self, account_id: AccountId) -> Result<Vec<FollowEdge>, sqlx::Error> {
        let rows: Vec<FollowRow> =
            sqlx::query_as("SELECT * FROM follows WHERE follower = $1 ORDER BY followed_at")
                .bind(account_id.as_uuid())
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(FollowEdge::from).collect())
    }
}
