//! Token error types.
//!
//! Failures fall into three kinds: schema violations raised while creating a
//! token, verification failures raised while checking one, and configuration
//! failures when key material or signing is unavailable.

use crate::claims::FieldType;
use thiserror::Error;

/// Token operation result type
pub type TokenResult<T> = Result<T, TokenError>;

/// Claim set rejected by a [`ClaimSchema`](crate::ClaimSchema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    /// Claim name is not declared and the schema does not pass undeclared claims through
    #[error("claim `{0}` is not declared in the schema")]
    UndeclaredField(String),
    /// Value type differs from the declared field type
    #[error("claim `{field}` expects {expected} but got {found}")]
    TypeMismatch {
        /// Claim name
        field: String,
        /// Declared type
        expected: FieldType,
        /// Runtime type of the supplied value
        found: &'static str,
    },
    /// Value has the declared type but cannot be carried in a token
    #[error("claim `{field}` has an unusable value: {reason}")]
    InvalidValue {
        /// Claim name
        field: String,
        /// Why the value was rejected
        reason: String,
    },
    /// One or more required claims are absent
    #[error("missing required claims: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    /// Name collides with a registered claim stamped by the manager
    #[error("claim `{0}` is reserved for registered token claims")]
    ReservedClaim(String),
}

/// Reason a token failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Token is not a well-formed compact serialization
    #[error("malformed token: {0}")]
    Malformed(String),
    /// Header names an algorithm other than the configured one
    #[error("algorithm mismatch: expected {expected}, found {found}")]
    AlgorithmMismatch {
        /// Configured algorithm
        expected: String,
        /// Algorithm named in the header
        found: String,
    },
    /// Signature does not match the signing input
    #[error("invalid signature")]
    InvalidSignature,
    /// Issuer claim is absent or differs from the configured issuer
    #[error("invalid issuer: expected {expected}, found {}", .found.as_deref().unwrap_or("none"))]
    InvalidIssuer {
        /// Configured issuer
        expected: String,
        /// Issuer carried by the token
        found: Option<String>,
    },
    /// Expiry has elapsed
    #[error("token expired at {expired_at}")]
    Expired {
        /// Embedded `exp` (unix seconds)
        expired_at: i64,
    },
    /// `nbf` lies in the future
    #[error("token not valid before {not_before}")]
    NotYetValid {
        /// Embedded `nbf` (unix seconds)
        not_before: i64,
    },
    /// `iat` lies in the future
    #[error("token issued in the future at {issued_at}")]
    IssuedInFuture {
        /// Embedded `iat` (unix seconds)
        issued_at: i64,
    },
    /// A registered claim required for verification is absent
    #[error("missing registered claim: {0}")]
    MissingClaim(&'static str),
    /// A registered time claim is present but not a NumericDate
    #[error("registered claim `{0}` is not a NumericDate")]
    InvalidNumericDate(&'static str),
}

/// Broad failure category, for callers that map errors onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied claims that do not satisfy the schema
    Schema,
    /// Token was rejected
    Verification,
    /// Key material or signing setup is unusable
    Configuration,
}

/// Token error types
#[derive(Debug, Error)]
pub enum TokenError {
    /// Claim set does not satisfy the schema
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    /// Token failed verification
    #[error("token verification failed: {0}")]
    Verification(#[from] VerificationError),
    /// Key material could not be obtained or parsed
    #[error("key material unavailable: {0}")]
    KeyMaterial(String),
    /// Signing operation failed
    #[error("signing failed: {0}")]
    Signing(String),
    /// Manager configuration is invalid
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl TokenError {
    /// Failure category of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::Schema(_) => ErrorKind::Schema,
            TokenError::Verification(_) => ErrorKind::Verification,
            TokenError::KeyMaterial(_) | TokenError::Signing(_) | TokenError::Configuration(_) => {
                ErrorKind::Configuration
            }
        }
    }

    /// Whether the token itself was rejected
    #[inline]
    #[must_use]
    pub fn is_verification(&self) -> bool {
        self.kind() == ErrorKind::Verification
    }

    /// Create a key material error
    #[inline]
    #[must_use]
    pub fn key_material(msg: &str) -> Self {
        TokenError::KeyMaterial(msg.to_string())
    }

    /// Create a signing error
    #[inline]
    #[must_use]
    pub fn signing(msg: &str) -> Self {
        TokenError::Signing(msg.to_string())
    }

    /// Create a configuration error
    #[inline]
    #[must_use]
    pub fn configuration(msg: &str) -> Self {
        TokenError::Configuration(msg.to_string())
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed(msg: &str) -> Self {
        TokenError::Verification(VerificationError::Malformed(msg.to_string()))
    }
}
