use crate::application_impl::token_codec::*;
use crate::application_port::{AccessToken, AuthError, TokenError};
use crate::domain_model::{AccessClaims, SigningSecret, UserId};
use chrono::{DateTime, Utc};

/// Mints and checks short-lived HS256 access tokens.
///
/// Pure over its input and the shared secret; clone it freely across tasks.
#[derive(Debug, Clone)]
pub struct AccessTokenCodec {
    secret: SigningSecret,
}

impl AccessTokenCodec {
    pub fn new(secret: SigningSecret) -> Self {
        AccessTokenCodec { secret }
    }

    pub fn issue(&self, subject: &UserId) -> Result<(AccessToken, DateTime<Utc>), AuthError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError> {
        let claims = AccessClaims::new(subject, now.timestamp());
        let payload =
            serde_json::to_vec(&claims).map_err(|e| AuthError::InternalError(e.to_string()))?;
        let signed = format!(
            "{}.{}",
            encode_segment(HEADER_JSON.as_bytes()),
            encode_segment(&payload)
        );
        let signature = sign(&self.secret, &signed);
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or_else(|| {
            AuthError::InternalError(format!("expiry out of range: {}", claims.exp))
        })?;
        Ok((AccessToken(format!("{signed}.{signature}")), expires_at))
    }

    pub fn validate(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        match TokenCandidate::parse(token) {
            TokenCandidate::Access(parts) => self.validate_parts(&parts, now),
            TokenCandidate::Opaque(_) => Err(TokenError::Malformed),
        }
    }

    /// Signature first; the claims are not looked at until it matches.
    pub fn validate_parts(
        &self,
        parts: &AccessParts<'_>,
        now: DateTime<Utc>,
    ) -> Result<AccessClaims, TokenError> {
        verify_signature(&self.secret, parts)?;

        let payload = decode_segment(parts.payload)?;
        let claims: AccessClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.is_expired_at(now.timestamp()) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    pub fn extract_subject(&self, token: &str) -> Result<UserId, TokenError> {
        self.extract_subject_at(token, Utc::now())
    }

    pub fn extract_subject_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError> {
        self.validate_at(token, now).map(|claims| claims.subject())
    }
}
