use crate::application_impl::token_codec::{encode_segment, new_mac};
use crate::domain_model::{RefreshTokenRecord, SigningSecret, UserId};
use chrono::{DateTime, Utc};
use hmac::Mac;
use rand::RngCore;
use rand::rngs::OsRng;

const NONCE_LEN: usize = 32;

/// Derives opaque refresh tokens: base64url(HMAC(secret, subject || nonce)).
///
/// The output has no internal structure; everything about the token lives in
/// its stored record.
#[derive(Debug, Clone)]
pub struct RefreshTokenMinter {
    secret: SigningSecret,
}

impl RefreshTokenMinter {
    pub fn new(secret: SigningSecret) -> Self {
        RefreshTokenMinter { secret }
    }

    pub fn mint_at(&self, subject: &UserId, now: DateTime<Utc>) -> RefreshTokenRecord {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        let token = self.derive(subject, &nonce);
        RefreshTokenRecord::new(token, subject.clone(), now)
    }

    fn derive(&self, subject: &UserId, nonce: &[u8; NONCE_LEN]) -> String {
        let mut mac = new_mac(&self.secret);
        mac.update(subject.as_str().as_bytes());
        mac.update(nonce);
        encode_segment(&mac.finalize().into_bytes())
    }
}
