//! Wire compatibility with the `jsonwebtoken` crate

mod common;

use chrono::Utc;
use common::{HS256_SECRET, TEST_PRIVATE_KEY, TEST_PUBLIC_KEY, user_schema};
use cryypt_token::algorithms::rsa::RsaHash;
use cryypt_token::{ClaimSet, ClaimValue, RsaAlgorithm, StaticProvider, TokenManager};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Value, json};

fn hs256_manager() -> TokenManager {
    TokenManager::builder("svc", user_schema())
        .provider(StaticProvider::hs256(HS256_SECRET.to_vec()).unwrap())
        .build()
        .unwrap()
}

fn validation(alg: Algorithm) -> Validation {
    let mut validation = Validation::new(alg);
    validation.set_issuer(&["svc"]);
    validation.leeway = 0;
    validation
}

#[test]
fn test_hs256_tokens_decode_with_jsonwebtoken() {
    let manager = hs256_manager();
    let token = manager
        .create(&ClaimSet::new().with("sub", "u1").with("admin", true))
        .unwrap();

    let data = decode::<Value>(
        &token,
        &DecodingKey::from_secret(HS256_SECRET),
        &validation(Algorithm::HS256),
    )
    .unwrap();

    assert_eq!(data.header.alg, Algorithm::HS256);
    assert_eq!(data.claims["sub"], json!("u1"));
    assert_eq!(data.claims["admin"], json!(true));
    assert_eq!(data.claims["jti"].as_str().map(str::len), Some(32));
}

#[test]
fn test_jsonwebtoken_hs256_tokens_verify_here() {
    let claims = json!({
        "iss": "svc",
        "sub": "u2",
        "exp": Utc::now().timestamp() + 600,
    });
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(HS256_SECRET),
    )
    .unwrap();

    let parsed = hs256_manager().verify_and_parse_payload(&token).unwrap();
    assert_eq!(parsed.get("sub"), Some(&ClaimValue::from("u2")));
    assert!(!parsed.contains("admin"));
}

#[test]
fn test_jsonwebtoken_fractional_exp_is_accepted() {
    let exp = Utc::now().timestamp() as f64 + 600.5;
    let token = encode(
        &Header::new(Algorithm::HS256),
        &json!({"iss": "svc", "sub": "u2", "exp": exp}),
        &EncodingKey::from_secret(HS256_SECRET),
    )
    .unwrap();

    let decoded = hs256_manager().verify(&token).unwrap();
    assert_eq!(
        decoded.expires_at().map(|t| t.timestamp()),
        Some(exp.floor() as i64)
    );
}

#[test]
fn test_expired_jsonwebtoken_token_is_rejected() {
    let claims = json!({"iss": "svc", "sub": "u2", "exp": Utc::now().timestamp() - 600});
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(HS256_SECRET),
    )
    .unwrap();

    assert!(hs256_manager().verify(&token).unwrap_err().is_verification());
}

#[test]
fn test_rs256_interop_both_directions() {
    let manager = TokenManager::builder("svc", user_schema())
        .provider(StaticProvider::new(
            RsaAlgorithm::from_private_pem(RsaHash::Sha256, TEST_PRIVATE_KEY).unwrap(),
        ))
        .build()
        .unwrap();

    let ours = manager.create(&ClaimSet::new().with("sub", "u1")).unwrap();
    let decoding_key = DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap();
    let data = decode::<Value>(&ours, &decoding_key, &validation(Algorithm::RS256)).unwrap();
    assert_eq!(data.claims["iss"], json!("svc"));

    let encoding_key = EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY.as_bytes()).unwrap();
    let theirs = encode(
        &Header::new(Algorithm::RS256),
        &json!({"iss": "svc", "sub": "u3", "exp": Utc::now().timestamp() + 600}),
        &encoding_key,
    )
    .unwrap();
    let decoded = manager.verify(&theirs).unwrap();
    assert_eq!(decoded.claim("sub"), Some(&json!("u3")));
}
