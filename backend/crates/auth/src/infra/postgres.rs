//! Postgres Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{Account, Passcode};
use crate::domain::repository::{
    AccountRepository, PasscodeRepository, TokenDenylistRepository,
};
use crate::domain::value_object::Email;

/// Unique-violation error code (Postgres class 23)
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    is_verified: bool,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    /// Rehydrate the entity. A malformed row (bad email or hash) is a
    /// data corruption, surfaced as a decode error.
    fn into_account(self) -> Result<Account, sqlx::Error> {
        let email = Email::new(self.email).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash,
            is_verified: self.is_verified,
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "account_id, email, first_name, last_name, password_hash, \
     is_verified, is_active, is_staff, is_superuser, last_login_at, created_at, updated_at";

impl AccountRepository for PgAuthRepository {
    async fn create(&self, account: &Account) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id, email, first_name, last_name, password_hash,
                is_verified, is_active, is_staff, is_superuser,
                last_login_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.password_hash.as_phc_string())
        .bind(account.is_verified)
        .bind(account.is_active)
        .bind(account.is_staff)
        .bind(account.is_superuser)
        .bind(account.last_login_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, account_id: AccountId) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1"
        ))
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.0)
    }

    async fn update(&self, account: &Account) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET email = $2, first_name = $3, last_name = $4, password_hash = $5,
                is_verified = $6, is_active = $7, is_staff = $8, is_superuser = $9,
                last_login_at = $10, updated_at = $11
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.password_hash.as_phc_string())
        .bind(account.is_verified)
        .bind(account.is_active)
        .bind(account.is_staff)
        .bind(account.is_superuser)
        .bind(account.last_login_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_verified(&self, account_id: AccountId) -> Result<bool, sqlx::Error> {
        // Conditional update: exactly one caller wins under concurrency
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET is_verified = TRUE, updated_at = NOW()
            WHERE account_id = $1 AND is_verified = FALSE
            "#,
        )
        .bind(account_id.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

impl PasscodeRepository for PgAuthRepository {
    async fn put(&self, passcode: &Passcode) -> Result<bool, sqlx::Error> {
        // Upsert on the account: a re-issued code supersedes the old
        // one. A collision on the global code uniqueness reports false
        // so the caller can draw a fresh code.
        let result = sqlx::query(
            r#"
            INSERT INTO passcodes (account_id, code, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id)
            DO UPDATE SET code = EXCLUDED.code, created_at = EXCLUDED.created_at
            "#,
        )
        .bind(passcode.account_id.as_uuid())
        .bind(&passcode.code)
        .bind(passcode.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn find_account_by_code(&self, code: &str) -> Result<Option<AccountId>, sqlx::Error> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT account_id FROM passcodes WHERE code = $1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(uuid,)| AccountId::from_uuid(uuid)))
    }
}

impl TokenDenylistRepository for PgAuthRepository {
    async fn deny(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO refresh_denylist (jti, expires_at, denied_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_denylist WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
