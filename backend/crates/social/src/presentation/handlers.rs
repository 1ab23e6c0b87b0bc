//! HTTP Handlers
//!
//! Read endpoints are public; write endpoints require a bearer token
//! and take the caller from the `CurrentAccount` extension installed
//! by the auth middleware.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::id::{AccountId, CommentId, PostId, ProfileId};
use uuid::Uuid;

use auth::presentation::middleware::CurrentAccount;

use crate::application::comment_service::CommentService;
use crate::application::follow_service::FollowService;
use crate::application::post_service::{PostPatch, PostService};
use crate::application::profile_service::{ProfileService, ProfileUpdateOutcome};
use crate::domain::entity::ProfilePatch;
use crate::domain::repository::{
    AccountDirectory, CommentRepository, FollowRepository, PostRepository, ProfileRepository,
};
use crate::error::SocialResult;
use crate::presentation::dto::{
    CommentResponse, CreateCommentRequest, CreatePostRequest, CreateProfileRequest,
    DetailResponse, FollowEdgeResponse, PostResponse, ProfileResponse, UpdatePostRequest,
    UpdateProfileRequest,
};

/// Bound alias for everything the social handlers need
pub trait SocialRepo:
    AccountDirectory
    + ProfileRepository
    + PostRepository
    + CommentRepository
    + FollowRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> SocialRepo for T where
    T: AccountDirectory
        + ProfileRepository
        + PostRepository
        + CommentRepository
        + FollowRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}

/// Shared state for all social routes
pub struct SocialAppState<R> {
    pub repo: Arc<R>,
}

impl<R> Clone for SocialAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R> SocialAppState<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// `POST /profiles`
pub async fn create_profile<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Json(body): Json<CreateProfileRequest>,
) -> SocialResult<Response> {
    let service = ProfileService::new(state.repo);
    let profile = service
        .create(
            &body.email,
            ProfilePatch {
                bio: body.bio,
                picture_url: body.picture_url,
                location: body.location,
            },
        )
        .await?;

    let email = service.owner_email(&profile).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse::from_profile(profile, email)),
    )
        .into_response())
}

/// `GET /profiles`
pub async fn list_profiles<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
) -> SocialResult<Json<Vec<ProfileResponse>>> {
    let service = ProfileService::new(state.repo);
    let mut out = Vec::new();
    for profile in service.list().await? {
        let email = service.owner_email(&profile).await?;
        out.push(ProfileResponse::from_profile(profile, email));
    }
    Ok(Json(out))
}

/// `GET /profiles/{id}`
pub async fn get_profile<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Path(profile_id): Path<Uuid>,
) -> SocialResult<Json<ProfileResponse>> {
    let service = ProfileService::new(state.repo);
    let profile = service.get(ProfileId::from_uuid(profile_id)).await?;
    let email = service.owner_email(&profile).await?;
    Ok(Json(ProfileResponse::from_profile(profile, email)))
}

/// `PUT /profiles/{id}`
pub async fn update_profile<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Path(profile_id): Path<Uuid>,
    Json(body): Json<UpdateProfileRequest>,
) -> SocialResult<Response> {
    let service = ProfileService::new(state.repo);
    let outcome = service
        .update(
            ProfileId::from_uuid(profile_id),
            ProfilePatch {
                bio: body.bio,
                picture_url: body.picture_url,
                location: body.location,
            },
        )
        .await?;

    match outcome {
        ProfileUpdateOutcome::Updated(profile) => {
            let email = service.owner_email(&profile).await?;
            Ok(Json(ProfileResponse::from_profile(profile, email)).into_response())
        }
        ProfileUpdateOutcome::NoChanges => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

// ============================================================================
// Posts
// ============================================================================

/// `POST /posts` (authenticated)
pub async fn create_post<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Extension(caller): Extension<CurrentAccount>,
    Json(body): Json<CreatePostRequest>,
) -> SocialResult<Response> {
    let service = PostService::new(state.repo);
    let post = service
        .create(caller.account_id, body.content, body.image_url, body.categories)
        .await?;
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))).into_response())
}

/// `GET /posts`
pub async fn list_posts<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
) -> SocialResult<Json<Vec<PostResponse>>> {
    let posts = PostService::new(state.repo).list().await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// `GET /posts/{id}`
pub async fn get_post<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Path(post_id): Path<Uuid>,
) -> SocialResult<Json<PostResponse>> {
    let post = PostService::new(state.repo)
        .get(PostId::from_uuid(post_id))
        .await?;
    Ok(Json(PostResponse::from(post)))
}

/// `PUT /posts/{id}` (authenticated)
pub async fn update_post<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Path(post_id): Path<Uuid>,
    Json(body): Json<UpdatePostRequest>,
) -> SocialResult<Json<PostResponse>> {
    let post = PostService::new(state.repo)
        .update(
            PostId::from_uuid(post_id),
            PostPatch {
                content: body.content,
                image_url: body.image_url,
                categories: body.categories,
            },
        )
        .await?;
    Ok(Json(PostResponse::from(post)))
}

/// `DELETE /posts/{id}` (authenticated)
pub async fn delete_post<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Path(post_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    PostService::new(state.repo)
        .delete(PostId::from_uuid(post_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Comments
// ============================================================================

/// `POST /posts/{id}/comments` (authenticated)
pub async fn create_comment<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Extension(caller): Extension<CurrentAccount>,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CreateCommentRequest>,
) -> SocialResult<Response> {
    let comment = CommentService::new(state.repo)
        .create(caller.account_id, PostId::from_uuid(post_id), body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))).into_response())
}

/// `GET /comments`
pub async fn list_comments<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
) -> SocialResult<Json<Vec<CommentResponse>>> {
    let comments = CommentService::new(state.repo).list().await?;
    Ok(Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

/// `GET /comments/{id}`
pub async fn get_comment<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Path(comment_id): Path<Uuid>,
) -> SocialResult<Json<CommentResponse>> {
    let comment = CommentService::new(state.repo)
        .get(CommentId::from_uuid(comment_id))
        .await?;
    Ok(Json(CommentResponse::from(comment)))
}

/// `DELETE /comments/{id}` (authenticated)
pub async fn delete_comment<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Path(comment_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    CommentService::new(state.repo)
        .delete(CommentId::from_uuid(comment_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Follow graph
// ============================================================================

/// `POST /follow/{user_id}` (authenticated)
pub async fn follow_user<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Extension(caller): Extension<CurrentAccount>,
    Path(user_id): Path<Uuid>,
) -> SocialResult<Response> {
    let target_email = FollowService::new(state.repo)
        .follow(caller.account_id, AccountId::from_uuid(user_id))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(DetailResponse::new(format!(
            "You are now following {target_email}"
        ))),
    )
        .into_response())
}

/// `DELETE /unfollow/{user_id}` (authenticated)
pub async fn unfollow_user<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Extension(caller): Extension<CurrentAccount>,
    Path(user_id): Path<Uuid>,
) -> SocialResult<StatusCode> {
    FollowService::new(state.repo)
        .unfollow(caller.account_id, AccountId::from_uuid(user_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /followers` (authenticated)
pub async fn get_followers<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Extension(caller): Extension<CurrentAccount>,
) -> SocialResult<Json<Vec<FollowEdgeResponse>>> {
    let edges = FollowService::new(state.repo)
        .followers(caller.account_id)
        .await?;
    Ok(Json(
        edges.into_iter().map(FollowEdgeResponse::from).collect(),
    ))
}

/// `GET /following` (authenticated)
pub async fn get_following<R: SocialRepo>(
    State(state): State<SocialAppState<R>>,
    Extension(caller): Extension<CurrentAccount>,
) -> SocialResult<Json<Vec<FollowEdgeResponse>>> {
    let edges = FollowService::new(state.repo)
        .following(caller.account_id)
        .await?;
    Ok(Json(
        edges.into_iter().map(FollowEdgeResponse::from).collect(),
    ))
}
