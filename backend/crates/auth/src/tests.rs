//! Auth use-case tests over the in-memory repository and a recording
//! mailer. Passcodes and reset links are pulled out of the captured
//! emails the way a real user would read them.

use std::sync::Arc;

use chrono::{Duration, Utc};
use platform::mailer::{OutboundEmail, RecordingMailer};

use crate::application::config::AuthConfig;
use crate::application::password_reset::{
    ConfirmResetTokenUseCase, RequestPasswordResetUseCase, SetNewPasswordInput,
    SetNewPasswordUseCase, make_reset_token_at,
};
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::application::resend_passcode::ResendPasscodeUseCase;
use crate::application::sign_in::SignInUseCase;
use crate::application::sign_out::SignOutUseCase;
use crate::application::token_service::{TokenService, verify_access};
use crate::application::verify_email::VerifyEmailUseCase;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::Email;
use crate::error::AuthError;
use crate::infra::memory::MemAuthRepository;

fn setup() -> (Arc<MemAuthRepository>, Arc<RecordingMailer>, Arc<AuthConfig>) {
    (
        Arc::new(MemAuthRepository::new()),
        Arc::new(RecordingMailer::new()),
        Arc::new(AuthConfig::with_random_secret()),
    )
}

fn alice_input() -> RegisterInput {
    RegisterInput {
        email: "alice@example.com".into(),
        first_name: "Alice".into(),
        last_name: "Smith".into(),
        password: "correct horse battery".into(),
        password_confirm: "correct horse battery".into(),
    }
}

/// The passcode is the final token of the verification email body
fn passcode_from(email: &OutboundEmail) -> String {
    email
        .body
        .rsplit_once(": ")
        .map(|(_, code)| code.trim().to_string())
        .expect("verification email carries a passcode")
}

async fn register_alice(
    repo: &Arc<MemAuthRepository>,
    mailer: &Arc<RecordingMailer>,
    config: &Arc<AuthConfig>,
) -> String {
    RegisterUseCase::new(repo.clone(), mailer.clone(), config.clone())
        .execute(alice_input())
        .await
        .expect("registration succeeds");
    passcode_from(&mailer.last().expect("verification email sent"))
}

#[tokio::test]
async fn test_register_sends_passcode_email() {
    let (repo, mailer, config) = setup();
    let code = register_alice(&repo, &mailer, &config).await;

    assert_eq!(code.len(), config.passcode_length);
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");

    let email = Email::new("alice@example.com").unwrap();
    let account = repo.find_by_email(&email).await.unwrap().unwrap();
    assert!(!account.is_verified);
}

#[tokio::test]
async fn test_register_rejects_password_mismatch() {
    let (repo, mailer, config) = setup();
    let use_case = RegisterUseCase::new(repo, mailer.clone(), config);

    let result = use_case
        .execute(RegisterInput {
            password_confirm: "something else entirely".into(),
            ..alice_input()
        })
        .await;

    assert!(matches!(result, Err(AuthError::Validation(_))));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (repo, mailer, config) = setup();
    register_alice(&repo, &mailer, &config).await;

    let result = RegisterUseCase::new(repo, mailer, config)
        .execute(alice_input())
        .await;
    assert!(matches!(result, Err(AuthError::Conflict(_))));
}

#[tokio::test]
async fn test_register_mailer_failure_keeps_account() {
    let (repo, _, config) = setup();
    let failing = Arc::new(RecordingMailer::failing());

    let result = RegisterUseCase::new(repo.clone(), failing, config)
        .execute(alice_input())
        .await;
    assert!(matches!(result, Err(AuthError::Upstream(_))));

    // Account exists, so the user can recover via resend-passcode
    let email = Email::new("alice@example.com").unwrap();
    assert!(repo.exists_by_email(&email).await.unwrap());
}

#[tokio::test]
async fn test_verify_unknown_code_not_found() {
    let (repo, _, _) = setup();
    let result = VerifyEmailUseCase::new(repo).execute("ZZZZZZ").await;
    assert!(matches!(result, Err(AuthError::NotFound(_))));
}

#[tokio::test]
async fn test_verify_twice_is_idempotent() {
    let (repo, mailer, config) = setup();
    let code = register_alice(&repo, &mailer, &config).await;

    let use_case = VerifyEmailUseCase::new(repo);
    let first = use_case.execute(&code).await.unwrap();
    assert!(!first.already_verified);
    assert_eq!(first.email.as_str(), "alice@example.com");

    let second = use_case.execute(&code).await.unwrap();
    assert!(second.already_verified);
}

#[tokio::test]
async fn test_login_requires_verification() {
    let (repo, mailer, config) = setup();
    register_alice(&repo, &mailer, &config).await;

    let result = SignInUseCase::new(repo, config)
        .execute("alice@example.com".into(), "correct horse battery".into())
        .await;
    assert!(matches!(result, Err(AuthError::AuthFailed)));
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_alike() {
    let (repo, mailer, config) = setup();
    let code = register_alice(&repo, &mailer, &config).await;
    VerifyEmailUseCase::new(repo.clone())
        .execute(&code)
        .await
        .unwrap();

    let sign_in = SignInUseCase::new(repo, config);

    let wrong_password = sign_in
        .execute("alice@example.com".into(), "incorrect horse battery".into())
        .await;
    let unknown_email = sign_in
        .execute("mallory@example.com".into(), "correct horse battery".into())
        .await;

    assert!(matches!(wrong_password, Err(AuthError::AuthFailed)));
    assert!(matches!(unknown_email, Err(AuthError::AuthFailed)));
    assert_eq!(
        wrong_password.unwrap_err().to_string(),
        unknown_email.unwrap_err().to_string(),
    );
}

#[tokio::test]
async fn test_register_verify_login_logout_roundtrip() {
    let (repo, mailer, config) = setup();
    let code = register_alice(&repo, &mailer, &config).await;

    VerifyEmailUseCase::new(repo.clone())
        .execute(&code)
        .await
        .unwrap();

    let output = SignInUseCase::new(repo.clone(), config.clone())
        .execute("alice@example.com".into(), "correct horse battery".into())
        .await
        .unwrap();
    assert_eq!(output.full_name, "Alice Smith");

    // Access token resolves back to the account
    let email = Email::new("alice@example.com").unwrap();
    let account = repo.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(
        verify_access(&config, &output.tokens.access).unwrap(),
        account.account_id,
    );
    assert!(account.last_login_at.is_some());

    let sign_out = SignOutUseCase::new(repo, config);
    sign_out.execute(&output.tokens.refresh).await.unwrap();

    // Second sign-out with the same token is rejected
    let again = sign_out.execute(&output.tokens.refresh).await;
    assert!(matches!(again, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_logout_rejects_garbage_and_access_tokens() {
    let (repo, mailer, config) = setup();
    let code = register_alice(&repo, &mailer, &config).await;
    VerifyEmailUseCase::new(repo.clone())
        .execute(&code)
        .await
        .unwrap();
    let output = SignInUseCase::new(repo.clone(), config.clone())
        .execute("alice@example.com".into(), "correct horse battery".into())
        .await
        .unwrap();

    let sign_out = SignOutUseCase::new(repo, config);

    let garbage = sign_out.execute("not.a.token").await;
    assert!(matches!(garbage, Err(AuthError::InvalidToken)));

    // An access token cannot stand in for a refresh token
    let wrong_use = sign_out.execute(&output.tokens.access).await;
    assert!(matches!(wrong_use, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_tampered_access_token_rejected() {
    let (repo, mailer, config) = setup();
    let code = register_alice(&repo, &mailer, &config).await;
    VerifyEmailUseCase::new(repo.clone())
        .execute(&code)
        .await
        .unwrap();
    let output = SignInUseCase::new(repo, config.clone())
        .execute("alice@example.com".into(), "correct horse battery".into())
        .await
        .unwrap();

    let mut tampered = output.tokens.access.clone();
    tampered.pop();
    assert!(verify_access(&config, &tampered).is_err());

    // A refresh token is not an access token either
    assert!(verify_access(&config, &output.tokens.refresh).is_err());
}

#[tokio::test]
async fn test_expired_tokens_rejected() {
    let (repo, _, _) = setup();
    // Tokens born expired, past jsonwebtoken's default leeway
    let config = Arc::new(AuthConfig {
        access_ttl: Duration::minutes(-5),
        refresh_ttl: Duration::minutes(-5),
        ..AuthConfig::with_random_secret()
    });

    let tokens = TokenService::new(config.clone(), repo.clone())
        .issue(kernel::id::AccountId::new())
        .unwrap();

    assert!(matches!(
        verify_access(&config, &tokens.access),
        Err(AuthError::InvalidToken)
    ));

    let sign_out = SignOutUseCase::new(repo, config);
    let result = sign_out.execute(&tokens.refresh).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_resend_supersedes_old_passcode() {
    let (repo, mailer, config) = setup();
    let old_code = register_alice(&repo, &mailer, &config).await;

    ResendPasscodeUseCase::new(repo.clone(), mailer.clone(), config)
        .execute("alice@example.com".into())
        .await
        .unwrap();
    let new_code = passcode_from(&mailer.last().unwrap());
    assert_ne!(old_code, new_code);

    let verify = VerifyEmailUseCase::new(repo);
    let stale = verify.execute(&old_code).await;
    assert!(matches!(stale, Err(AuthError::NotFound(_))));

    let fresh = verify.execute(&new_code).await.unwrap();
    assert!(!fresh.already_verified);
}

#[tokio::test]
async fn test_resend_rejects_verified_account() {
    let (repo, mailer, config) = setup();
    let code = register_alice(&repo, &mailer, &config).await;
    VerifyEmailUseCase::new(repo.clone())
        .execute(&code)
        .await
        .unwrap();

    let result = ResendPasscodeUseCase::new(repo, mailer, config)
        .execute("alice@example.com".into())
        .await;
    assert!(matches!(result, Err(AuthError::Validation(_))));
}

#[tokio::test]
async fn test_password_reset_roundtrip_consumes_ticket() {
    let (repo, mailer, config) = setup();
    let code = register_alice(&repo, &mailer, &config).await;
    VerifyEmailUseCase::new(repo.clone())
        .execute(&code)
        .await
        .unwrap();

    let request = RequestPasswordResetUseCase::new(repo.clone(), mailer.clone(), config.clone());
    let ticket = request.execute("alice@example.com".into()).await.unwrap();
    assert!(
        mailer
            .last()
            .unwrap()
            .body
            .contains(&format!("/password-reset-confirm/{}/{}", ticket.uid, ticket.token)),
    );

    // Confirm endpoint is read-only
    let confirm = ConfirmResetTokenUseCase::new(repo.clone(), config.clone());
    confirm.execute(&ticket.uid, &ticket.token).await.unwrap();
    confirm.execute(&ticket.uid, &ticket.token).await.unwrap();

    SetNewPasswordUseCase::new(repo.clone(), config.clone())
        .execute(SetNewPasswordInput {
            uid: ticket.uid.clone(),
            token: ticket.token.clone(),
            password: "brand new passphrase".into(),
            password_confirm: "brand new passphrase".into(),
        })
        .await
        .unwrap();

    // The rotated hash invalidates the ticket
    let replay = confirm.execute(&ticket.uid, &ticket.token).await;
    assert!(matches!(replay, Err(AuthError::Unauthorized(_))));

    let sign_in = SignInUseCase::new(repo, config);
    assert!(matches!(
        sign_in
            .execute("alice@example.com".into(), "correct horse battery".into())
            .await,
        Err(AuthError::AuthFailed)
    ));
    sign_in
        .execute("alice@example.com".into(), "brand new passphrase".into())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_password_reset_unknown_email() {
    let (repo, mailer, config) = setup();
    let result = RequestPasswordResetUseCase::new(repo, mailer.clone(), config)
        .execute("nobody@example.com".into())
        .await;
    assert!(matches!(result, Err(AuthError::Validation(_))));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_password_reset_expired_ticket() {
    let (repo, mailer, config) = setup();
    register_alice(&repo, &mailer, &config).await;

    let email = Email::new("alice@example.com").unwrap();
    let account = repo.find_by_email(&email).await.unwrap().unwrap();

    let issued_at = Utc::now() - config.reset_ttl - Duration::minutes(1);
    let stale_token = make_reset_token_at(&config, &account, issued_at);
    let uid = crate::application::password_reset::encode_uid(account.account_id);

    let result = ConfirmResetTokenUseCase::new(repo, config)
        .execute(&uid, &stale_token)
        .await;
    assert!(matches!(result, Err(AuthError::Unauthorized(_))));
}

#[tokio::test]
async fn test_password_reset_bad_uid_and_forged_token() {
    let (repo, mailer, config) = setup();
    register_alice(&repo, &mailer, &config).await;

    let confirm = ConfirmResetTokenUseCase::new(repo.clone(), config.clone());

    let bad_uid = confirm.execute("!!not-base64!!", "whatever").await;
    assert!(matches!(bad_uid, Err(AuthError::Unauthorized(_))));

    let email = Email::new("alice@example.com").unwrap();
    let account = repo.find_by_email(&email).await.unwrap().unwrap();
    let uid = crate::application::password_reset::encode_uid(account.account_id);

    // Signed with a different secret
    let other_config = AuthConfig::with_random_secret();
    let forged = crate::application::password_reset::make_reset_token(&other_config, &account);
    let result = confirm.execute(&uid, &forged).await;
    assert!(matches!(result, Err(AuthError::Unauthorized(_))));
}
