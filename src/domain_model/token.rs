use crate::domain_model::UserId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of an access token. Part of the protocol, not a setting.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 600;

/// Lifetime of a refresh token record.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Signed payload of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}

impl AccessClaims {
    pub fn new(subject: &UserId, now_secs: i64) -> Self {
        AccessClaims {
            sub: subject.0.clone(),
            iat: now_secs,
            exp: now_secs + ACCESS_TOKEN_TTL_SECS,
        }
    }

    /// `exp` itself is still inside the validity window.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        now_secs > self.exp
    }

    pub fn subject(&self) -> UserId {
        UserId(self.sub.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Expired,
    Revoked,
}

/// Server-side state of an opaque refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl RefreshTokenRecord {
    /// Timestamps are cut to whole microseconds, the finest precision the
    /// MySQL store keeps, so a record reads back exactly as it was issued.
    pub fn new(token: String, user_id: UserId, issued_at: DateTime<Utc>) -> Self {
        let issued_at = issued_at.trunc_subsecs(6);
        RefreshTokenRecord {
            token,
            user_id,
            issued_at,
            expires_at: issued_at + chrono::Duration::seconds(REFRESH_TOKEN_TTL_SECS),
            revoked: false,
        }
    }

    /// Expiry is evaluated lazily here; nothing flips the record in storage.
    /// Revocation wins over expiry.
    pub fn state_at(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.revoked {
            RefreshTokenState::Revoked
        } else if now > self.expires_at {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }
}
