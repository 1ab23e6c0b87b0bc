//! HTTP Handlers
//!
//! Thin adapters from DTOs to use cases. Handlers are generic over the
//! repository and mailer so the same routes serve Postgres in
//! production and the in-memory stack in tests.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};

use platform::mailer::Mailer;

use crate::application::config::AuthConfig;
use crate::application::password_reset::{
    ConfirmResetTokenUseCase, RequestPasswordResetUseCase, SetNewPasswordInput,
    SetNewPasswordUseCase,
};
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::application::resend_passcode::ResendPasscodeUseCase;
use crate::application::sign_in::SignInUseCase;
use crate::application::sign_out::SignOutUseCase;
use crate::application::verify_email::VerifyEmailUseCase;
use crate::domain::repository::{
    AccountRepository, PasscodeRepository, TokenDenylistRepository,
};
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, LoginResponse, LogoutRequest, MessageResponse, PasswordResetRequest,
    RegisterRequest, RegisterResponse, ResendPasscodeRequest, ResetConfirmResponse,
    SetNewPasswordRequest, VerifyEmailRequest,
};

/// Shared state for all auth routes
pub struct AuthAppState<R, M> {
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

impl<R, M> Clone for AuthAppState<R, M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, M> AuthAppState<R, M> {
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }
}

/// `POST /register`
pub async fn register<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(body): Json<RegisterRequest>,
) -> AuthResult<Json<RegisterResponse>>
where
    R: AccountRepository + PasscodeRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo, state.mailer, state.config);
    let output = use_case
        .execute(RegisterInput {
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
            password_confirm: body.password_confirm,
        })
        .await?;

    let message = format!(
        "Hi {}, thanks for signing up. A passcode has been sent to your email.",
        output.first_name
    );
    Ok(Json(RegisterResponse {
        email: output.email.as_str().to_string(),
        first_name: output.first_name,
        last_name: output.last_name,
        message,
    }))
}

/// `POST /verify-email`
pub async fn verify_email<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(body): Json<VerifyEmailRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + PasscodeRepository + Clone + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    let use_case = VerifyEmailUseCase::new(state.repo);
    let output = use_case.execute(&body.otp).await?;

    let message = if output.already_verified {
        "Email already verified".to_string()
    } else {
        "Email verified successfully".to_string()
    };
    Ok(Json(MessageResponse::new(message)))
}

/// `POST /resend-passcode`
pub async fn resend_passcode<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(body): Json<ResendPasscodeRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + PasscodeRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ResendPasscodeUseCase::new(state.repo, state.mailer, state.config);
    use_case.execute(body.email).await?;
    Ok(Json(MessageResponse::new(
        "A new passcode has been sent to your email",
    )))
}

/// `POST /login`
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(body): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: AccountRepository + TokenDenylistRepository + Clone + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo, state.config);
    let output = use_case.execute(body.email, body.password).await?;

    Ok(Json(LoginResponse {
        email: output.email.as_str().to_string(),
        full_name: output.full_name,
        access_token: output.tokens.access,
        refresh_token: output.tokens.refresh,
    }))
}

/// `POST /logout` (authenticated)
pub async fn logout<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(body): Json<LogoutRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: TokenDenylistRepository + Clone + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    let use_case = SignOutUseCase::new(state.repo, state.config);
    use_case.execute(&body.refresh_token).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// `POST /password-reset-request`
pub async fn password_reset_request<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(body): Json<PasswordResetRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RequestPasswordResetUseCase::new(state.repo, state.mailer, state.config);
    use_case.execute(body.email).await?;
    Ok(Json(MessageResponse::new(
        "A link has been sent to your email to reset your password",
    )))
}

/// `GET /password-reset-confirm/{uid}/{token}`
pub async fn password_reset_confirm<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Path((uid, token)): Path<(String, String)>,
) -> AuthResult<Json<ResetConfirmResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    let use_case = ConfirmResetTokenUseCase::new(state.repo, state.config);
    let output = use_case.execute(&uid, &token).await?;

    Ok(Json(ResetConfirmResponse {
        success: true,
        message: "Credentials valid".to_string(),
        uid: output.uid,
        token: output.token,
    }))
}

/// `POST /set-new-password`
pub async fn set_new_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(body): Json<SetNewPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    let use_case = SetNewPasswordUseCase::new(state.repo, state.config);
    use_case
        .execute(SetNewPasswordInput {
            uid: body.uid,
            token: body.token,
            password: body.password,
            password_confirm: body.password_confirm,
        })
        .await?;
    Ok(Json(MessageResponse::new("Password reset successful")))
}
