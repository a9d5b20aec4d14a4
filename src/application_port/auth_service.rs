use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Why a presented token was turned down.
///
/// Never crosses the boolean boundary of `TokenService`; kept for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("token expired")]
    Expired,
    #[error("token revoked")]
    Revoked,
    #[error("token not found")]
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user already exists")]
    UserExists,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("hashing failure: {0}")]
    HashingFailure(String),
    #[error("authentication temporarily unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    /// Callers should retry or degrade instead of treating the user as
    /// unauthenticated.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AuthError::StoreUnavailable(_))
    }
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub identifier: String,
    pub display_name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user_id: UserId,
    pub display_name: String,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    /// A malformed hash reads as a wrong password.
    async fn verify_password(&self, password: &str, password_hash: &str) -> bool;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, request: RegisterInput) -> Result<LoginResult, AuthError>;
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError>;
}
