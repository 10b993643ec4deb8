//! Type-directed conversion between claim values and JSON payload values.

use crate::claims::{ClaimValue, FieldType};
use crate::error::SchemaViolation;
use crate::token;
use chrono::DateTime;
use serde_json::{Number, Value};

/// Encode one claim for the payload. Timestamps become NumericDate
/// seconds; extension values are written as their string form.
pub(crate) fn encode_claim(name: &str, value: &ClaimValue) -> Result<Value, SchemaViolation> {
    let encoded = match value {
        ClaimValue::Boolean(b) => Value::Bool(*b),
        ClaimValue::Integer(n) => Value::from(*n),
        ClaimValue::Long(n) => Value::from(*n),
        ClaimValue::Double(d) => {
            let number = Number::from_f64(*d).ok_or_else(|| SchemaViolation::InvalidValue {
                field: name.to_string(),
                reason: format!("{d} is not a finite number"),
            })?;
            Value::Number(number)
        }
        ClaimValue::Timestamp(t) => Value::from(t.timestamp()),
        ClaimValue::String(s) => Value::String(s.clone()),
        ClaimValue::Extension(Value::String(s)) => Value::String(s.clone()),
        ClaimValue::Extension(other) => Value::String(other.to_string()),
    };
    Ok(encoded)
}

/// Decode a payload value as the declared type. `None` when the JSON value
/// does not fit.
pub(crate) fn decode_claim(value: &Value, field_type: FieldType) -> Option<ClaimValue> {
    match field_type {
        FieldType::Boolean => value.as_bool().map(ClaimValue::Boolean),
        FieldType::Integer => value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(ClaimValue::Integer),
        FieldType::Long => value.as_i64().map(ClaimValue::Long),
        FieldType::Double => value.as_f64().map(ClaimValue::Double),
        FieldType::Timestamp => token::numeric_date(value)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(ClaimValue::Timestamp),
        FieldType::String => value.as_str().map(|s| ClaimValue::String(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamp_is_numeric_date() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let encoded = encode_claim("at", &ClaimValue::Timestamp(at)).unwrap();

        assert_eq!(encoded, json!(1_700_000_000));
        assert_eq!(
            decode_claim(&encoded, FieldType::Timestamp),
            Some(ClaimValue::Timestamp(at))
        );
    }

    #[test]
    fn test_sub_second_precision_is_floored() {
        let at = DateTime::from_timestamp_millis(-500).unwrap();
        let encoded = encode_claim("at", &ClaimValue::Timestamp(at)).unwrap();

        assert_eq!(encoded, json!(-1));
        assert_eq!(
            decode_claim(&json!(1_700_000_000.9), FieldType::Timestamp),
            Some(ClaimValue::Timestamp(
                DateTime::from_timestamp(1_700_000_000, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_extension_is_written_as_string() {
        let value = ClaimValue::Extension(json!({"a": [1, 2]}));
        assert_eq!(encode_claim("x", &value).unwrap(), json!(r#"{"a":[1,2]}"#));

        let value = ClaimValue::Extension(json!("plain"));
        assert_eq!(encode_claim("x", &value).unwrap(), json!("plain"));
    }

    #[test]
    fn test_non_finite_double_is_rejected() {
        assert!(encode_claim("ratio", &ClaimValue::Double(f64::NAN)).is_err());
    }

    #[test]
    fn test_integer_out_of_range_does_not_decode() {
        assert_eq!(decode_claim(&json!(i64::MAX), FieldType::Integer), None);
        assert_eq!(
            decode_claim(&json!(i64::MAX), FieldType::Long),
            Some(ClaimValue::Long(i64::MAX))
        );
    }

    #[test]
    fn test_wrong_json_type_does_not_decode() {
        assert_eq!(decode_claim(&json!("true"), FieldType::Boolean), None);
        assert_eq!(decode_claim(&json!(1), FieldType::String), None);
        assert_eq!(decode_claim(&json!(1.5), FieldType::Long), None);
    }

    #[test]
    fn test_double_accepts_integral_json() {
        assert_eq!(
            decode_claim(&json!(3), FieldType::Double),
            Some(ClaimValue::Double(3.0))
        );
    }
}
