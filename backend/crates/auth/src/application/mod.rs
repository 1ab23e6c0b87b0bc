//! Application Layer
//!
//! Use cases orchestrating the domain. Each use case owns its
//! collaborators behind `Arc` and exposes a single `execute`.

pub mod config;
pub mod password_reset;
pub mod register;
pub mod resend_passcode;
pub mod sign_in;
pub mod sign_out;
pub mod token_service;
pub mod verify_email;

pub use password_reset::{
    ConfirmResetTokenUseCase, RequestPasswordResetUseCase, SetNewPasswordUseCase,
};
pub use register::RegisterUseCase;
pub use resend_passcode::ResendPasscodeUseCase;
pub use sign_in::SignInUseCase;
pub use sign_out::SignOutUseCase;
pub use token_service::{Claims, TokenPair, TokenService, TokenUse, verify_access};
pub use verify_email::VerifyEmailUseCase;
