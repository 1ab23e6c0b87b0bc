//! JWT Issuance and Invalidation
//!
//! Paired access/refresh tokens, HS256. Sign-out records the refresh
//! token's jti in a denylist; the access token simply ages out.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::AccountId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::repository::TokenDenylistRepository;
use crate::error::{AuthError, AuthResult};

/// What a token is good for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    /// Account id
    pub sub: String,
    /// Token id, the denylist key for refresh tokens
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub token_use: TokenUse,
}

/// An access/refresh pair issued at sign-in
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Issues and invalidates token pairs
pub struct TokenService<D> {
    config: Arc<AuthConfig>,
    denylist: Arc<D>,
}

impl<D> TokenService<D>
where
    D: TokenDenylistRepository + Send + Sync,
{
    pub fn new(config: Arc<AuthConfig>, denylist: Arc<D>) -> Self {
        Self { config, denylist }
    }

    /// Issue a fresh access/refresh pair for the account
    pub fn issue(&self, account_id: AccountId) -> AuthResult<TokenPair> {
        let now = Utc::now();
        let access = self.encode_token(account_id, TokenUse::Access, now)?;
        let refresh = self.encode_token(account_id, TokenUse::Refresh, now)?;
        Ok(TokenPair { access, refresh })
    }

    fn encode_token(
        &self,
        account_id: AccountId,
        token_use: TokenUse,
        now: chrono::DateTime<Utc>,
    ) -> AuthResult<String> {
        let ttl = match token_use {
            TokenUse::Access => self.config.access_ttl,
            TokenUse::Refresh => self.config.refresh_ttl,
        };
        let claims = Claims {
            iss: self.config.issuer.clone(),
            sub: account_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_use,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.config.jwt_secret),
        )
        .map_err(|e| AuthError::Internal(format!("token encoding failed: {e}")))
    }

    /// Invalidate a refresh token (sign-out)
    ///
    /// Decodes and validates the token, then records its jti on the
    /// denylist. A malformed, expired, wrong-use, or already-denied
    /// token is reported as [`AuthError::InvalidToken`].
    pub async fn invalidate(&self, refresh_token: &str) -> AuthResult<()> {
        let claims = decode_claims(&self.config, refresh_token)?;

        if claims.token_use != TokenUse::Refresh {
            return Err(AuthError::InvalidToken);
        }

        let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0)
            .ok_or(AuthError::InvalidToken)?;

        let newly_denied = self.denylist.deny(&claims.jti, expires_at).await?;
        if !newly_denied {
            return Err(AuthError::InvalidToken);
        }
        Ok(())
    }
}

/// Validate a bearer access token and extract the account id
pub fn verify_access(config: &AuthConfig, token: &str) -> AuthResult<AccountId> {
    let claims = decode_claims(config, token)?;

    if claims.token_use != TokenUse::Access {
        return Err(AuthError::InvalidToken);
    }

    let uuid = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
    Ok(AccountId::from_uuid(uuid))
}

fn decode_claims(config: &AuthConfig, token: &str) -> AuthResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&config.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}
