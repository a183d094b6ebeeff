use crate::domain_model::{AuthenticatedIdentity, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Codec-level failures. Never shown to clients as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token malformed or signature invalid")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("token has the wrong kind")]
    WrongKind,
}

/// Field name to list of messages, kept ordered for stable responses.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token invalid: {0}")]
    InvalidToken(#[from] TokenError),
    #[error("token revoked")]
    Revoked,
    #[error("subject not found")]
    SubjectNotFound,
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Verified contents of a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject: UserId,
    pub kind: TokenKind,
    pub jti: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Signs and verifies self-contained credentials. Pure: the only inputs are
/// the token, the clock and the signing key.
pub trait TokenCodec: Send + Sync {
    fn issue(
        &self,
        subject: UserId,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<IssuedToken, AuthError>;
    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError>;
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
    pub identity: AuthenticatedIdentity,
}

#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access: IssuedToken,
    /// Present only when refresh rotation is enabled.
    pub refresh: Option<IssuedToken>,
}
