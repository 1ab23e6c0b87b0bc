//! In-Memory Repository Implementation
//!
//! Backs the test suite and local experimentation. A `Clone` hands out
//! another handle to the same shared state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use uuid::Uuid;

use crate::domain::entity::{Account, Passcode};
use crate::domain::repository::{
    AccountRepository, PasscodeRepository, TokenDenylistRepository,
};
use crate::domain::value_object::Email;

#[derive(Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    by_email: HashMap<String, Uuid>,
    /// code -> account
    passcodes: HashMap<String, Uuid>,
    /// account -> outstanding code
    code_by_account: HashMap<Uuid, String>,
    denylist: HashMap<String, DateTime<Utc>>,
}

/// Shared-state in-memory implementation of every auth repository trait
#[derive(Clone, Default)]
pub struct MemAuthRepository {
    state: Arc<Mutex<State>>,
}

impl MemAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("repository lock poisoned")
    }
}

impl AccountRepository for MemAuthRepository {
    async fn create(&self, account: &Account) -> Result<(), sqlx::Error> {
        let mut state = self.lock();
        let uuid = account.account_id.into_uuid();
        state.accounts.insert(uuid, account.clone());
        state.by_email.insert(account.email.as_str().to_string(), uuid);
        Ok(())
    }

    async fn find_by_id(&self, account_id: AccountId) -> Result<Option<Account>, sqlx::Error> {
        Ok(self.lock().accounts.get(account_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, sqlx::Error> {
        let state = self.lock();
        Ok(state
            .by_email
            .get(email.as_str())
            .and_then(|uuid| state.accounts.get(uuid))
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool, sqlx::Error> {
        Ok(self.lock().by_email.contains_key(email.as_str()))
    }

    async fn update(&self, account: &Account) -> Result<(), sqlx::Error> {
        let mut state = self.lock();
        let uuid = account.account_id.into_uuid();
        let old_email = state
            .accounts
            .get(&uuid)
            .map(|existing| existing.email.as_str().to_string());
        if let Some(old_email) = old_email {
            if old_email != account.email.as_str() {
                state.by_email.remove(&old_email);
                state
                    .by_email
                    .insert(account.email.as_str().to_string(), uuid);
            }
        }
        state.accounts.insert(uuid, account.clone());
        Ok(())
    }

    async fn mark_verified(&self, account_id: AccountId) -> Result<bool, sqlx::Error> {
        let mut state = self.lock();
        match state.accounts.get_mut(account_id.as_uuid()) {
            Some(account) => Ok(account.mark_verified()),
            None => Ok(false),
        }
    }
}

impl PasscodeRepository for MemAuthRepository {
    async fn put(&self, passcode: &Passcode) -> Result<bool, sqlx::Error> {
        let mut state = self.lock();
        let uuid = passcode.account_id.into_uuid();

        // Global code uniqueness, same as the database constraint
        if let Some(owner) = state.passcodes.get(&passcode.code) {
            if *owner != uuid {
                return Ok(false);
            }
        }

        if let Some(old_code) = state.code_by_account.remove(&uuid) {
            state.passcodes.remove(&old_code);
        }
        state.passcodes.insert(passcode.code.clone(), uuid);
        state.code_by_account.insert(uuid, passcode.code.clone());
        Ok(true)
    }

    async fn find_account_by_code(&self, code: &str) -> Result<Option<AccountId>, sqlx::Error> {
        Ok(self
            .lock()
            .passcodes
            .get(code)
            .map(|uuid| AccountId::from_uuid(*uuid)))
    }
}

impl TokenDenylistRepository for MemAuthRepository {
    async fn deny(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        let mut state = self.lock();
        if state.denylist.contains_key(jti) {
            return Ok(false);
        }
        state.denylist.insert(jti.to_string(), expires_at);
        Ok(true)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let mut state = self.lock();
        let before = state.denylist.len();
        state.denylist.retain(|_, expires_at| *expires_at >= now);
        Ok((before - state.denylist.len()) as u64)
    }
}
