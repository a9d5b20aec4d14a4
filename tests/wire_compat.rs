//! Access tokens interoperate with a stock HS256 JWT library.

mod common;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use parley::application_impl::AccessTokenCodec;
use parley::application_port::TokenError;
use parley::domain_model::{AccessClaims, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

fn strict_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation
}

#[test]
fn jwt_library_accepts_our_tokens() {
    let codec = AccessTokenCodec::new(common::secret());
    let (token, expires_at) = codec.issue(&UserId::from("1337")).unwrap();

    let decoded = decode::<Claims>(
        &token.0,
        &DecodingKey::from_secret(common::TEST_SECRET.as_bytes()),
        &strict_validation(),
    )
    .unwrap();

    assert_eq!(decoded.header.alg, Algorithm::HS256);
    assert_eq!(decoded.header.typ.as_deref(), Some("JWT"));
    assert_eq!(decoded.claims.sub, "1337");
    assert_eq!(decoded.claims.exp, expires_at.timestamp());
    assert_eq!(decoded.claims.exp - decoded.claims.iat, 600);
}

#[test]
fn jwt_library_rejects_our_tokens_under_another_key() {
    let codec = AccessTokenCodec::new(common::secret());
    let (token, _) = codec.issue(&UserId::from("1337")).unwrap();

    let result = decode::<Claims>(
        &token.0,
        &DecodingKey::from_secret(b"some-other-secret"),
        &strict_validation(),
    );
    assert!(result.is_err());
}

#[test]
fn we_accept_tokens_minted_by_the_jwt_library() {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "user-9".to_string(),
        iat: now,
        exp: now + 600,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let codec = AccessTokenCodec::new(common::secret());
    let parsed: AccessClaims = codec.validate(&token).unwrap();
    assert_eq!(parsed.sub, "user-9");
    assert_eq!(codec.extract_subject(&token).unwrap(), UserId::from("user-9"));
}

#[test]
fn expired_library_tokens_are_rejected() {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "user-9".to_string(),
        iat: now - 700,
        exp: now - 100,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let codec = AccessTokenCodec::new(common::secret());
    assert_eq!(codec.validate(&token), Err(TokenError::Expired));
}
