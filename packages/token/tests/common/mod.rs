//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use cryypt_token::{ClaimSchema, FieldType};

/// RSA-2048 test key pair, never used outside tests
pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/test_rsa_private.pem");
pub const TEST_PUBLIC_KEY: &str = include_str!("../fixtures/test_rsa_public.pem");

pub const HS256_SECRET: &[u8] = b"integration-test-hs256-secret-0123456789";

pub fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// `sub` required string, `admin` optional boolean
pub fn user_schema() -> ClaimSchema {
    ClaimSchema::builder()
        .required("sub", FieldType::String)
        .optional("admin", FieldType::Boolean)
        .build()
        .unwrap()
}
