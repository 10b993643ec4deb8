//! Serializable token manager settings.

use crate::error::SchemaViolation;
use crate::manager::DEFAULT_EXPIRES_IN_MINUTES;
use crate::schema::{ClaimSchema, FieldSpec};
use serde::{Deserialize, Serialize};

/// Serializable token manager settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenManagerConfig {
    /// Value stamped into and required of the `iss` claim
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Token lifetime; `exp` is `now + expires_in_minutes` at creation
    #[serde(default = "default_expires_in_minutes")]
    pub expires_in_minutes: i64,
    /// Clock skew tolerated by `exp`, `nbf` and `iat` checks
    #[serde(default)]
    pub leeway_seconds: i64,
    /// Pass undeclared claims through `create` instead of rejecting them
    #[serde(default)]
    pub allow_undeclared: bool,
    /// Declared claims
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

fn default_issuer() -> String {
    "access_token".to_string()
}

fn default_expires_in_minutes() -> i64 {
    DEFAULT_EXPIRES_IN_MINUTES
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            expires_in_minutes: default_expires_in_minutes(),
            leeway_seconds: 0,
            allow_undeclared: false,
            fields: Vec::new(),
        }
    }
}

impl TokenManagerConfig {
    /// Build the claim schema these settings declare.
    ///
    /// # Errors
    /// Returns `SchemaViolation::ReservedClaim` if a field uses a registered name.
    pub fn schema(&self) -> Result<ClaimSchema, SchemaViolation> {
        self.fields
            .iter()
            .cloned()
            .fold(ClaimSchema::builder(), |builder, spec| builder.field(spec))
            .allow_undeclared(self.allow_undeclared)
            .build()
    }
}
