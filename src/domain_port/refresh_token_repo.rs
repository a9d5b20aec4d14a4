use crate::application_port::*;
use crate::domain_model::*;

/// Persistent refresh token state.
///
/// Implementations must give read-after-write consistency per token string:
/// once `mark_revoked` has returned, every later `find_by_token` for that
/// token sees `revoked = true`.
#[async_trait::async_trait]
pub trait RefreshTokenRepo: Send + Sync {
    /// Single atomic insert.
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), AuthError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Returns `false` when no record exists for `token`. Revoking an already
    /// revoked record returns `true`.
    async fn mark_revoked(&self, token: &str) -> Result<bool, AuthError>;
}
