//! Token header and verified token view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JWS header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Algorithm used for signing
    pub alg: String,
    /// Token type, `"JWT"` for tokens issued here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Key ID hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl TokenHeader {
    /// Header for a freshly issued token
    #[must_use]
    pub fn new(alg: &str, kid: Option<&str>) -> Self {
        Self {
            alg: alg.to_string(),
            typ: Some("JWT".to_string()),
            kid: kid.map(str::to_string),
        }
    }
}

/// A token whose signature, issuer and validity window have been checked.
///
/// Claims are kept as raw JSON; typed extraction is done against a schema
/// by [`TokenManager::parse_payload`](crate::TokenManager::parse_payload).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    token: String,
    header: TokenHeader,
    claims: Map<String, Value>,
}

impl DecodedToken {
    pub(crate) fn new(token: String, header: TokenHeader, claims: Map<String, Value>) -> Self {
        Self {
            token,
            header,
            claims,
        }
    }

    /// The compact token this was decoded from
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Decoded header
    #[must_use]
    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// Header `alg`
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.header.alg
    }

    /// Header `kid`
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.header.kid.as_deref()
    }

    /// `iss` claim
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.claims.get("iss").and_then(Value::as_str)
    }

    /// `jti` claim
    #[must_use]
    pub fn token_id(&self) -> Option<&str> {
        self.claims.get("jti").and_then(Value::as_str)
    }

    /// `exp` claim
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.numeric_date("exp")
    }

    /// `iat` claim
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.numeric_date("iat")
    }

    /// `nbf` claim
    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.numeric_date("nbf")
    }

    /// Raw claim by name
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// All raw claims
    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    fn numeric_date(&self, name: &str) -> Option<DateTime<Utc>> {
        self.claims
            .get(name)
            .and_then(numeric_date)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Read a NumericDate as whole seconds. Non-integer values are floored.
pub(crate) fn numeric_date(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|secs| secs.is_finite() && (i64::MIN as f64..i64::MAX as f64).contains(secs))
            .map(|secs| secs.floor() as i64)
    })
}
