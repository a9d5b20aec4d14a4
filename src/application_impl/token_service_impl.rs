use crate::application_impl::store_timeout::with_store_timeout;
use crate::application_impl::token_codec::TokenCandidate;
use crate::application_impl::{AccessTokenCodec, RefreshTokenMinter};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::RefreshTokenRepo;
use crate::logger::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

pub struct RealTokenService {
    access_codec: AccessTokenCodec,
    refresh_minter: RefreshTokenMinter,
    refresh_repo: Arc<dyn RefreshTokenRepo>,
    store_timeout: Duration,
}

impl RealTokenService {
    pub fn new(
        secret: SigningSecret,
        refresh_repo: Arc<dyn RefreshTokenRepo>,
        store_timeout: Duration,
    ) -> Self {
        RealTokenService {
            access_codec: AccessTokenCodec::new(secret.clone()),
            refresh_minter: RefreshTokenMinter::new(secret),
            refresh_repo,
            store_timeout,
        }
    }

    /// Store lookup plus the lazy state check. Token rejections come back as
    /// `AuthError::Token`, store trouble as `AuthError::StoreUnavailable`.
    async fn lookup_refresh(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, AuthError> {
        let record = with_store_timeout(
            self.store_timeout,
            "find_by_token",
            self.refresh_repo.find_by_token(token),
        )
        .await?
        .ok_or(TokenError::NotFound)?;

        match record.state_at(now) {
            RefreshTokenState::Active => Ok(record),
            RefreshTokenState::Revoked => Err(TokenError::Revoked.into()),
            RefreshTokenState::Expired => Err(TokenError::Expired.into()),
        }
    }

    fn check_access(&self, token: &str) -> bool {
        match self.access_codec.validate(token) {
            Ok(_) => true,
            Err(reason) => {
                debug!(kind = "access", %reason, "token rejected");
                false
            }
        }
    }
}

/// Collapses a token rejection into `false`; store failures pass through.
fn verdict<T>(kind: &'static str, result: Result<T, AuthError>) -> Result<bool, AuthError> {
    match result {
        Ok(_) => Ok(true),
        Err(AuthError::Token(reason)) => {
            debug!(kind, %reason, "token rejected");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

#[async_trait::async_trait]
impl TokenService for RealTokenService {
    async fn issue_access_token(
        &self,
        subject: &UserId,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError> {
        self.access_codec.issue(subject)
    }

    async fn issue_refresh_token(
        &self,
        subject: &UserId,
    ) -> Result<(RefreshToken, DateTime<Utc>), AuthError> {
        let record = self.refresh_minter.mint_at(subject, Utc::now());
        with_store_timeout(
            self.store_timeout,
            "insert_refresh_record",
            self.refresh_repo.insert(&record),
        )
        .await?;
        Ok((RefreshToken(record.token), record.expires_at))
    }

    async fn validate_token(&self, token: &str) -> Result<bool, AuthError> {
        match TokenCandidate::parse(token) {
            TokenCandidate::Access(_) => Ok(self.check_access(token)),
            TokenCandidate::Opaque(token) => {
                verdict("refresh", self.lookup_refresh(token, Utc::now()).await)
            }
        }
    }

    async fn validate_access_token(&self, token: &str) -> bool {
        self.check_access(token)
    }

    async fn validate_refresh_token(&self, token: &str) -> Result<bool, AuthError> {
        verdict("refresh", self.lookup_refresh(token, Utc::now()).await)
    }

    async fn extract_subject(&self, token: &str) -> Option<UserId> {
        match self.access_codec.extract_subject(token) {
            Ok(subject) => Some(subject),
            Err(reason) => {
                debug!(kind = "access", %reason, "subject not extracted");
                None
            }
        }
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, AuthError> {
        let record = match self.lookup_refresh(refresh_token, Utc::now()).await {
            Ok(record) => record,
            Err(AuthError::Token(reason)) => {
                debug!(kind = "refresh", %reason, "refresh refused");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let (access_token, _) = self.access_codec.issue(&record.user_id)?;
        Ok(Some(access_token))
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), AuthError> {
        let found = with_store_timeout(
            self.store_timeout,
            "mark_revoked",
            self.refresh_repo.mark_revoked(token),
        )
        .await?;
        if !found {
            return Err(TokenError::NotFound.into());
        }
        info!("refresh token revoked");
        Ok(())
    }
}
