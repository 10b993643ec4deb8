//! Property tests: any claim set accepted by the schema survives a round trip

mod common;

use chrono::DateTime;
use common::HS256_SECRET;
use cryypt_token::{ClaimSchema, ClaimSet, FieldType, StaticProvider, TokenManager};
use proptest::prelude::*;

fn schema() -> ClaimSchema {
    ClaimSchema::builder()
        .required("name", FieldType::String)
        .optional("active", FieldType::Boolean)
        .optional("count", FieldType::Integer)
        .optional("balance", FieldType::Long)
        .optional("ratio", FieldType::Double)
        .optional("seen", FieldType::Timestamp)
        .build()
        .unwrap()
}

fn claim_sets() -> impl Strategy<Value = ClaimSet> {
    (
        ".*",
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<i32>()),
        proptest::option::of(any::<i64>()),
        proptest::option::of(proptest::num::f64::NORMAL | proptest::num::f64::ZERO),
        proptest::option::of(0_i64..4_102_444_800),
    )
        .prop_map(|(name, active, count, balance, ratio, seen)| {
            let mut claims = ClaimSet::new().with("name", name);
            if let Some(v) = active {
                claims.insert("active", v);
            }
            if let Some(v) = count {
                claims.insert("count", v);
            }
            if let Some(v) = balance {
                claims.insert("balance", v);
            }
            if let Some(v) = ratio {
                claims.insert("ratio", v);
            }
            if let Some(secs) = seen {
                claims.insert("seen", DateTime::from_timestamp(secs, 0).unwrap());
            }
            claims
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_create_then_parse_is_identity(claims in claim_sets()) {
        let manager = TokenManager::builder("svc", schema())
            .provider(StaticProvider::hs256(HS256_SECRET.to_vec()).unwrap())
            .build()
            .unwrap();

        let token = manager.create(&claims).unwrap();
        prop_assert_eq!(manager.verify_and_parse_payload(&token).unwrap(), claims);
    }
}
