//! Segment-level encoding shared by the access and refresh token paths.
//!
//! Access tokens are `header.payload.signature`, each part base64url without
//! padding. The only thing that tells an access token from a refresh token is
//! the number of `.`-separated segments, so parsing yields a tagged
//! [`TokenCandidate`] instead of a split vector.

use crate::application_port::TokenError;
use crate::domain_model::SigningSecret;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

pub type HmacSha256 = Hmac<Sha256>;

/// Fixed header of every access token we mint. Validation does not read it
/// back; it is only covered by the signature.
pub const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// The three parts of an access-token candidate, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessParts<'a> {
    /// `header.payload` exactly as received; this is what gets signed.
    pub signed: &'a str,
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCandidate<'a> {
    /// Exactly three segments.
    Access(AccessParts<'a>),
    /// Any other segment count, including a single empty segment.
    Opaque(&'a str),
}

impl<'a> TokenCandidate<'a> {
    pub fn parse(token: &'a str) -> Self {
        if token.bytes().filter(|b| *b == b'.').count() != 2 {
            return TokenCandidate::Opaque(token);
        }
        let Some((signed, signature)) = token.rsplit_once('.') else {
            return TokenCandidate::Opaque(token);
        };
        let Some((header, payload)) = signed.split_once('.') else {
            return TokenCandidate::Opaque(token);
        };
        TokenCandidate::Access(AccessParts {
            signed,
            header,
            payload,
            signature,
        })
    }
}

pub fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Strict decode: padding and non-canonical trailing bits are rejected, so
/// every accepted segment has exactly one spelling.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)
}

pub fn new_mac(secret: &SigningSecret) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length")
}

/// base64url(HMAC-SHA256(secret, signed)).
pub fn sign(secret: &SigningSecret, signed: &str) -> String {
    let mut mac = new_mac(secret);
    mac.update(signed.as_bytes());
    encode_segment(&mac.finalize().into_bytes())
}

/// Recomputes the signature over `parts.signed` and compares it with the
/// received one in constant time.
pub fn verify_signature(secret: &SigningSecret, parts: &AccessParts<'_>) -> Result<(), TokenError> {
    let received = decode_segment(parts.signature)?;
    let mut mac = new_mac(secret);
    mac.update(parts.signed.as_bytes());
    mac.verify_slice(&received)
        .map_err(|_| TokenError::SignatureMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SigningSecret {
        SigningSecret::new("codec-test-secret").unwrap()
    }

    #[test]
    fn three_segments_are_access_candidates() {
        let parsed = TokenCandidate::parse("aaa.bbb.ccc");
        assert_eq!(
            parsed,
            TokenCandidate::Access(AccessParts {
                signed: "aaa.bbb",
                header: "aaa",
                payload: "bbb",
                signature: "ccc",
            })
        );
    }

    #[test]
    fn empty_segments_still_count() {
        assert!(matches!(
            TokenCandidate::parse(".."),
            TokenCandidate::Access(AccessParts {
                header: "",
                payload: "",
                signature: "",
                ..
            })
        ));
    }

    #[test]
    fn other_segment_counts_are_opaque() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a.b.c.d.e", "...."] {
            assert_eq!(TokenCandidate::parse(token), TokenCandidate::Opaque(token));
        }
    }

    #[test]
    fn header_segment_is_stable() {
        assert_eq!(
            encode_segment(HEADER_JSON.as_bytes()),
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"
        );
    }

    #[test]
    fn decode_rejects_padding_and_foreign_alphabet() {
        assert_eq!(decode_segment("YQ"), Ok(b"a".to_vec()));
        assert_eq!(decode_segment("YQ=="), Err(TokenError::Malformed));
        assert_eq!(decode_segment("a+b/"), Err(TokenError::Malformed));
        // "YR" carries non-zero trailing bits
        assert_eq!(decode_segment("YR"), Err(TokenError::Malformed));
    }

    #[test]
    fn signature_roundtrip_and_mismatch() {
        let secret = secret();
        let signature = sign(&secret, "head.body");
        assert_eq!(signature.len(), 43);

        let token = format!("head.body.{signature}");
        let TokenCandidate::Access(parts) = TokenCandidate::parse(&token) else {
            panic!("expected access candidate");
        };
        assert_eq!(verify_signature(&secret, &parts), Ok(()));

        let other = SigningSecret::new("another-secret").unwrap();
        assert_eq!(
            verify_signature(&other, &parts),
            Err(TokenError::SignatureMismatch)
        );
    }

    #[test]
    fn truncated_signature_is_a_mismatch() {
        let secret = secret();
        let signature = sign(&secret, "head.body");
        let token = format!("head.body.{}", &signature[..40]);
        let TokenCandidate::Access(parts) = TokenCandidate::parse(&token) else {
            panic!("expected access candidate");
        };
        assert_eq!(
            verify_signature(&secret, &parts),
            Err(TokenError::SignatureMismatch)
        );
    }
}
