//! Typed claim values and the field types a schema declares.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type a schema declares for a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// `bool`
    Boolean,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 64-bit float
    Double,
    /// UTC instant, carried as unix seconds
    Timestamp,
    /// UTF-8 string
    String,
}

impl FieldType {
    /// Lowercase name used in messages and configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Double => "double",
            FieldType::Timestamp => "timestamp",
            FieldType::String => "string",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single claim value.
///
/// Every [`FieldType`] has exactly one matching variant. `Extension` holds
/// values outside that set; it never satisfies a declared field and is
/// written into tokens as its string representation.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    /// Boolean claim
    Boolean(bool),
    /// 32-bit integer claim
    Integer(i32),
    /// 64-bit integer claim
    Long(i64),
    /// Floating point claim
    Double(f64),
    /// Instant claim, floored to whole seconds on the wire
    Timestamp(DateTime<Utc>),
    /// String claim
    String(String),
    /// Any other value
    Extension(serde_json::Value),
}

impl ClaimValue {
    /// The field type this value satisfies, `None` for `Extension`
    #[must_use]
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            ClaimValue::Boolean(_) => Some(FieldType::Boolean),
            ClaimValue::Integer(_) => Some(FieldType::Integer),
            ClaimValue::Long(_) => Some(FieldType::Long),
            ClaimValue::Double(_) => Some(FieldType::Double),
            ClaimValue::Timestamp(_) => Some(FieldType::Timestamp),
            ClaimValue::String(_) => Some(FieldType::String),
            ClaimValue::Extension(_) => None,
        }
    }

    /// Name of the runtime type, for diagnostics
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.field_type().map_or("extension", FieldType::as_str)
    }

    /// Boolean value, if this is a boolean claim
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClaimValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value, if this is an integer claim
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ClaimValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer value widened to `i64`, for integer and long claims
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Integer(n) => Some(i64::from(*n)),
            ClaimValue::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Float value, if this is a double claim
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ClaimValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Instant, if this is a timestamp claim
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            ClaimValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// String slice, if this is a string claim
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Boolean(value)
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Long(value)
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Double(value)
    }
}

impl From<DateTime<Utc>> for ClaimValue {
    fn from(value: DateTime<Utc>) -> Self {
        ClaimValue::Timestamp(value)
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<serde_json::Value> for ClaimValue {
    fn from(value: serde_json::Value) -> Self {
        ClaimValue::Extension(value)
    }
}
