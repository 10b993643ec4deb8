//! Claim schema: which claims a token may carry, their types, and which
//! of them are required.
//!
//! A schema is built once and shared read-only. Different managers can
//! hold different schemas (access vs refresh tokens, say) while sharing
//! the same [`TokenManager`](crate::TokenManager) implementation.

use crate::claims::{ClaimSet, ClaimValue, FieldType};
use crate::error::SchemaViolation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registered claims stamped or checked by the manager itself
pub const RESERVED_CLAIMS: [&str; 5] = ["iss", "exp", "iat", "nbf", "jti"];

/// Declaration of a single claim, as carried in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Claim name
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether `create` rejects claim sets without this claim
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    /// Declare a required claim
    #[must_use]
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
        }
    }

    /// Declare an optional claim
    #[must_use]
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Declared {
    field_type: FieldType,
    required: bool,
}

/// Immutable claim schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSchema {
    fields: BTreeMap<String, Declared>,
    allow_undeclared: bool,
}

impl ClaimSchema {
    /// Start building a schema
    #[must_use]
    pub fn builder() -> ClaimSchemaBuilder {
        ClaimSchemaBuilder::default()
    }

    /// Check one claim against the schema.
    ///
    /// # Errors
    /// Returns `SchemaViolation` if the name is reserved, undeclared (and
    /// undeclared claims are not passed through), or the value does not
    /// have the declared type.
    pub fn has_field(&self, name: &str, value: &ClaimValue) -> Result<(), SchemaViolation> {
        if is_reserved(name) {
            return Err(SchemaViolation::ReservedClaim(name.to_string()));
        }

        let Some(declared) = self.fields.get(name) else {
            return if self.allow_undeclared {
                Ok(())
            } else {
                Err(SchemaViolation::UndeclaredField(name.to_string()))
            };
        };

        if value.field_type() != Some(declared.field_type) {
            return Err(SchemaViolation::TypeMismatch {
                field: name.to_string(),
                expected: declared.field_type,
                found: value.type_name(),
            });
        }

        // JSON has no representation for NaN or infinities
        if let ClaimValue::Double(d) = value
            && !d.is_finite()
        {
            return Err(SchemaViolation::InvalidValue {
                field: name.to_string(),
                reason: format!("{d} is not a finite number"),
            });
        }

        Ok(())
    }

    /// Check that every required claim is present.
    ///
    /// # Errors
    /// Returns `SchemaViolation::MissingFields` listing every absent
    /// required claim in name order.
    pub fn missing_fields(&self, claims: &ClaimSet) -> Result<(), SchemaViolation> {
        let missing: Vec<String> = self
            .required_fields()
            .filter(|name| !claims.contains(name))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolation::MissingFields(missing))
        }
    }

    /// Check every claim, failing on the first bad one, then check for
    /// missing required claims.
    ///
    /// # Errors
    /// Returns the first `SchemaViolation` found.
    pub fn validate(&self, claims: &ClaimSet) -> Result<(), SchemaViolation> {
        for (name, value) in claims.iter() {
            self.has_field(name, value)?;
        }
        self.missing_fields(claims)
    }

    /// Declared fields and their types, in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields
            .iter()
            .map(|(name, declared)| (name.as_str(), declared.field_type))
    }

    /// Names of required fields, in name order
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, declared)| declared.required)
            .map(|(name, _)| name.as_str())
    }

    /// Declared type of a field
    #[must_use]
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).map(|declared| declared.field_type)
    }

    /// Whether a field is declared and required
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|declared| declared.required)
    }

    /// Whether undeclared claims are accepted and passed through on create
    #[must_use]
    pub fn allows_undeclared(&self) -> bool {
        self.allow_undeclared
    }

    /// Number of declared fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Vec<FieldSpec>> for ClaimSchema {
    type Error = SchemaViolation;

    fn try_from(specs: Vec<FieldSpec>) -> Result<Self, Self::Error> {
        specs
            .into_iter()
            .fold(ClaimSchema::builder(), ClaimSchemaBuilder::field)
            .build()
    }
}

/// Builder for [`ClaimSchema`]. Declaring a name twice keeps the last
/// declaration.
#[derive(Debug, Clone, Default)]
pub struct ClaimSchemaBuilder {
    fields: BTreeMap<String, Declared>,
    allow_undeclared: bool,
}

impl ClaimSchemaBuilder {
    /// Declare a required field
    #[must_use]
    pub fn required(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(FieldSpec::required(name, field_type))
    }

    /// Declare an optional field
    #[must_use]
    pub fn optional(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(FieldSpec::optional(name, field_type))
    }

    /// Declare a field from its spec
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.insert(
            spec.name,
            Declared {
                field_type: spec.field_type,
                required: spec.required,
            },
        );
        self
    }

    /// Accept undeclared claims on create and write them into the token
    /// unchecked. They are still dropped when a payload is parsed.
    #[must_use]
    pub fn allow_undeclared(mut self, allow: bool) -> Self {
        self.allow_undeclared = allow;
        self
    }

    /// Finish the schema.
    ///
    /// # Errors
    /// Returns `SchemaViolation::ReservedClaim` if a registered claim name
    /// was declared.
    pub fn build(self) -> Result<ClaimSchema, SchemaViolation> {
        if let Some(name) = self.fields.keys().find(|name| is_reserved(name)) {
            return Err(SchemaViolation::ReservedClaim(name.clone()));
        }
        Ok(ClaimSchema {
            fields: self.fields,
            allow_undeclared: self.allow_undeclared,
        })
    }
}

fn is_reserved(name: &str) -> bool {
    RESERVED_CLAIMS.contains(&name)
}
