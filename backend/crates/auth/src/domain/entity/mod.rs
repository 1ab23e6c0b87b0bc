//! Domain Entities

pub mod account;
pub mod passcode;

pub use account::Account;
pub use passcode::Passcode;
