//! Claim schema enforcement on token creation

mod common;

use chrono::DateTime;
use common::{HS256_SECRET, user_schema};
use cryypt_token::{
    ClaimSchema, ClaimSet, ClaimValue, ErrorKind, FieldSpec, FieldType, SchemaViolation,
    StaticProvider, TokenError, TokenManager, TokenManagerConfig,
};
use serde_json::json;

fn manager(schema: ClaimSchema) -> TokenManager {
    TokenManager::builder("svc", schema)
        .provider(StaticProvider::hs256(HS256_SECRET.to_vec()).unwrap())
        .build()
        .unwrap()
}

fn violation(err: TokenError) -> SchemaViolation {
    match err {
        TokenError::Schema(v) => v,
        other => panic!("expected a schema violation, got {other:?}"),
    }
}

#[test]
fn test_undeclared_claim_is_rejected() {
    let claims = ClaimSet::new().with("sub", "u1").with("email", "u1@example.com");
    let err = manager(user_schema()).create(&claims).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(
        violation(err),
        SchemaViolation::UndeclaredField("email".into())
    );
}

#[test]
fn test_type_mismatch_is_rejected() {
    let claims = ClaimSet::new().with("sub", "u1").with("admin", "yes");
    let err = violation(manager(user_schema()).create(&claims).unwrap_err());

    assert_eq!(
        err,
        SchemaViolation::TypeMismatch {
            field: "admin".into(),
            expected: FieldType::Boolean,
            found: "string",
        }
    );
    assert_eq!(err.to_string(), "claim `admin` expects boolean but got string");
}

#[test]
fn test_extension_never_satisfies_a_declared_field() {
    let claims = ClaimSet::new().with("sub", ClaimValue::Extension(json!("u1")));
    let err = violation(manager(user_schema()).create(&claims).unwrap_err());

    assert!(matches!(err, SchemaViolation::TypeMismatch { found: "extension", .. }));
}

#[test]
fn test_missing_required_claims_are_listed() {
    let schema = ClaimSchema::builder()
        .required("sub", FieldType::String)
        .required("tenant", FieldType::Long)
        .optional("admin", FieldType::Boolean)
        .build()
        .unwrap();
    let err = manager(schema)
        .create(&ClaimSet::new().with("admin", false))
        .unwrap_err();

    assert_eq!(
        violation(err),
        SchemaViolation::MissingFields(vec!["sub".into(), "tenant".into()])
    );
}

#[test]
fn test_bad_value_is_reported_before_missing_fields() {
    let claims = ClaimSet::new().with("admin", 1_i32);
    let err = violation(manager(user_schema()).create(&claims).unwrap_err());
    assert!(matches!(err, SchemaViolation::TypeMismatch { .. }));
}

#[test]
fn test_non_finite_double_is_rejected() {
    let schema = ClaimSchema::builder()
        .required("ratio", FieldType::Double)
        .build()
        .unwrap();
    let claims = ClaimSet::new().with("ratio", f64::INFINITY);

    assert!(matches!(
        violation(manager(schema).create(&claims).unwrap_err()),
        SchemaViolation::InvalidValue { .. }
    ));
}

#[test]
fn test_undeclared_claims_pass_through_when_allowed() {
    let schema = ClaimSchema::builder()
        .required("sub", FieldType::String)
        .allow_undeclared(true)
        .build()
        .unwrap();
    let manager = manager(schema);
    let claims = ClaimSet::new()
        .with("sub", "u1")
        .with("scope", "read write")
        .with("ctx", ClaimValue::Extension(json!({"ip": "10.0.0.1"})));

    let token = manager.create(&claims).unwrap();
    let decoded = manager.verify(&token).unwrap();
    assert_eq!(decoded.claim("scope"), Some(&json!("read write")));
    assert_eq!(decoded.claim("ctx"), Some(&json!(r#"{"ip":"10.0.0.1"}"#)));

    let parsed = manager.parse_payload(&decoded);
    assert_eq!(parsed, ClaimSet::new().with("sub", "u1"));
}

#[test]
fn test_reserved_names_cannot_be_declared() {
    for name in ["iss", "exp", "iat", "nbf", "jti"] {
        let err = ClaimSchema::builder()
            .optional(name, FieldType::String)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaViolation::ReservedClaim(name.into()));
    }
}

#[test]
fn test_every_field_type_round_trips() {
    let schema = ClaimSchema::try_from(vec![
        FieldSpec::required("b", FieldType::Boolean),
        FieldSpec::required("i", FieldType::Integer),
        FieldSpec::required("l", FieldType::Long),
        FieldSpec::required("d", FieldType::Double),
        FieldSpec::required("t", FieldType::Timestamp),
        FieldSpec::required("s", FieldType::String),
    ])
    .unwrap();
    let manager = manager(schema);
    let claims = ClaimSet::new()
        .with("b", false)
        .with("i", -7_i32)
        .with("l", 9_007_199_254_740_993_i64)
        .with("d", 0.1_f64)
        .with("t", DateTime::from_timestamp(1_234_567_890, 0).unwrap())
        .with("s", "ünïcödé");

    let token = manager.create(&claims).unwrap();
    assert_eq!(manager.verify_and_parse_payload(&token).unwrap(), claims);
}

#[test]
fn test_timestamp_loses_sub_second_part() {
    let schema = ClaimSchema::builder()
        .required("seen", FieldType::Timestamp)
        .build()
        .unwrap();
    let manager = manager(schema);
    let seen = DateTime::from_timestamp_millis(-500).unwrap();

    let token = manager.create(&ClaimSet::new().with("seen", seen)).unwrap();
    let parsed = manager.verify_and_parse_payload(&token).unwrap();

    assert_eq!(
        parsed.get("seen").and_then(ClaimValue::as_timestamp),
        DateTime::from_timestamp(-1, 0)
    );
}

#[test]
fn test_manager_from_config() {
    let config: TokenManagerConfig = serde_json::from_value(json!({
        "issuer": "svc",
        "expires_in_minutes": 5,
        "fields": [{"name": "sub", "type": "string", "required": true}]
    }))
    .unwrap();
    let manager =
        TokenManager::from_config(&config, StaticProvider::hs256(HS256_SECRET.to_vec()).unwrap())
            .unwrap();

    assert_eq!(manager.issuer(), "svc");
    assert!(manager.schema().is_required("sub"));
    assert_eq!(manager.expires_in(), chrono::Duration::minutes(5));
    assert!(manager.create(&ClaimSet::new()).is_err());
}
