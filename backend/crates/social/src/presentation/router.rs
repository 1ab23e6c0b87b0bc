//! Social Router Assembly

use std::sync::Arc;

use auth::application::config::AuthConfig;
use auth::presentation::middleware::{AuthMiddlewareState, require_auth};
use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use sqlx::PgPool;

use crate::infra::postgres::PgSocialRepository;
use crate::presentation::handlers::{self, SocialAppState, SocialRepo};

/// Build the social routes over any repository
pub fn social_router_generic<R: SocialRepo>(
    state: SocialAppState<R>,
    config: Arc<AuthConfig>,
) -> Router {
    let middleware_state = AuthMiddlewareState { config };
    let auth_layer = from_fn_with_state(middleware_state, require_auth);

    let public = Router::new()
        .route("/profiles", post(handlers::create_profile::<R>))
        .route("/profiles", get(handlers::list_profiles::<R>))
        .route("/profiles/{profile_id}", get(handlers::get_profile::<R>))
        .route("/profiles/{profile_id}", put(handlers::update_profile::<R>))
        .route("/posts", get(handlers::list_posts::<R>))
        .route("/posts/{post_id}", get(handlers::get_post::<R>))
        .route("/comments", get(handlers::list_comments::<R>))
        .route("/comments/{comment_id}", get(handlers::get_comment::<R>));

    let protected = Router::new()
        .route("/posts", post(handlers::create_post::<R>))
        .route("/posts/{post_id}", put(handlers::update_post::<R>))
        .route("/posts/{post_id}", delete(handlers::delete_post::<R>))
        .route(
            "/posts/{post_id}/comments",
            post(handlers::create_comment::<R>),
        )
        .route(
            "/comments/{comment_id}",
            delete(handlers::delete_comment::<R>),
        )
        .route("/follow/{user_id}", post(handlers::follow_user::<R>))
        .route("/unfollow/{user_id}", delete(handlers::unfollow_user::<R>))
        .route("/followers", get(handlers::get_followers::<R>))
        .route("/following", get(handlers::get_following::<R>))
        .route_layer(auth_layer);

    public.merge(protected).with_state(state)
}

/// Production router over Postgres
pub fn social_router(pool: PgPool, config: Arc<AuthConfig>) -> Router {
    let repo = Arc::new(PgSocialRepository::new(pool));
    social_router_generic(SocialAppState::new(repo), config)
}
