use crate::application_port::{AccessToken, AuthError, AuthTokens, RefreshToken};
use crate::domain_model::UserId;
use chrono::{DateTime, Utc};

/// Issue and check access/refresh tokens.
///
/// Checks answer with a plain verdict. The only error they return is
/// `AuthError::StoreUnavailable`, which means "could not decide", not
/// "invalid".
#[async_trait::async_trait]
pub trait TokenService: Send + Sync {
    async fn issue_access_token(
        &self,
        subject: &UserId,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError>;

    /// Mints an opaque token and persists its record before returning it.
    async fn issue_refresh_token(
        &self,
        subject: &UserId,
    ) -> Result<(RefreshToken, DateTime<Utc>), AuthError>;

    /// Three dot-separated segments go down the access path, anything else
    /// is looked up as a refresh token.
    async fn validate_token(&self, token: &str) -> Result<bool, AuthError>;

    async fn validate_access_token(&self, token: &str) -> bool;

    async fn validate_refresh_token(&self, token: &str) -> Result<bool, AuthError>;

    /// Subject of a valid access token.
    async fn extract_subject(&self, token: &str) -> Option<UserId>;

    /// New access token for the subject bound to `refresh_token`. The refresh
    /// token itself stays usable.
    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, AuthError>;

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), AuthError>;

    async fn issue_token_pair(&self, subject: &UserId) -> Result<AuthTokens, AuthError> {
        let (access_token, access_token_expires_at) = self.issue_access_token(subject).await?;
        let (refresh_token, refresh_token_expires_at) = self.issue_refresh_token(subject).await?;
        Ok(AuthTokens {
            access_token,
            refresh_token,
            access_token_expires_at,
            refresh_token_expires_at,
        })
    }
}
