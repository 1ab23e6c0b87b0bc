//! Auth Router Assembly

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use platform::mailer::Mailer;
use sqlx::PgPool;

use crate::application::config::AuthConfig;
use crate::domain::repository::{
    AccountRepository, PasscodeRepository, TokenDenylistRepository,
};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{
    self, AuthAppState,
};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth};

/// Build the auth routes over any repository/mailer pair
pub fn auth_router_generic<R, M>(state: AuthAppState<R, M>) -> Router
where
    R: AccountRepository
        + PasscodeRepository
        + TokenDenylistRepository
        + Clone
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let middleware_state = AuthMiddlewareState {
        config: state.config.clone(),
    };

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/verify-email", post(handlers::verify_email::<R, M>))
        .route("/resend-passcode", post(handlers::resend_passcode::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route(
            "/password-reset-request",
            post(handlers::password_reset_request::<R, M>),
        )
        .route(
            "/password-reset-confirm/{uid}/{token}",
            get(handlers::password_reset_confirm::<R, M>),
        )
        .route(
            "/set-new-password",
            post(handlers::set_new_password::<R, M>),
        )
        .route(
            "/logout",
            post(handlers::logout::<R, M>)
                .route_layer(from_fn_with_state(middleware_state, require_auth)),
        )
        .with_state(state)
}

/// Production router: Postgres repository plus the given mailer
pub fn auth_router<M>(pool: PgPool, mailer: Arc<M>, config: Arc<AuthConfig>) -> Router
where
    M: Mailer + Send + Sync + 'static,
{
    let repo = Arc::new(PgAuthRepository::new(pool));
    auth_router_generic(AuthAppState::new(repo, mailer, config))
}
