//! Token manager: issues and verifies signed tokens against a claim schema.
//!
//! `create` checks the claim set, stamps the registered claims, encodes each
//! claim by its type and signs. `verify` checks structure, algorithm,
//! signature, issuer and validity window in that order. `parse_payload`
//! turns a verified token back into a typed [`ClaimSet`].

mod builder;
mod codec;
mod validation;

pub use builder::{DEFAULT_EXPIRES_IN_MINUTES, TokenManagerBuilder};

use crate::algorithms::SigningAlgorithm;
use crate::claims::ClaimSet;
use crate::clock::Clock;
use crate::config::TokenManagerConfig;
use crate::error::{TokenError, TokenResult, VerificationError};
use crate::jws::{self, Segments};
use crate::provider::AlgorithmProvider;
use crate::schema::ClaimSchema;
use crate::token::{DecodedToken, TokenHeader};
use chrono::Duration;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;
use validation::RegisteredClaims;

/// Issues and verifies tokens for one issuer and one claim schema.
///
/// Cheap to clone; clones share configuration.
#[derive(Clone)]
pub struct TokenManager {
    inner: Arc<Inner>,
}

struct Inner {
    issuer: String,
    schema: ClaimSchema,
    window: Duration,
    leeway_seconds: i64,
    provider: Arc<dyn AlgorithmProvider>,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    /// Start building a manager for `issuer` with `schema`
    #[must_use]
    pub fn builder(issuer: impl Into<String>, schema: ClaimSchema) -> TokenManagerBuilder {
        TokenManagerBuilder::new(issuer.into(), schema)
    }

    /// Build a manager from serialized settings.
    ///
    /// # Errors
    /// Returns `TokenError::Schema` if a configured field is reserved, and
    /// the errors of [`TokenManagerBuilder::build`].
    pub fn from_config(
        config: &TokenManagerConfig,
        provider: impl AlgorithmProvider + 'static,
    ) -> TokenResult<Self> {
        Self::builder(config.issuer.clone(), config.schema()?)
            .expires_in_minutes(config.expires_in_minutes)
            .leeway_seconds(config.leeway_seconds)
            .provider(provider)
            .build()
    }

    /// Issue a signed token carrying `claims`.
    ///
    /// Timestamp claims are written as whole seconds; any sub-second part
    /// is floored away.
    ///
    /// # Errors
    /// Returns `TokenError::Schema` if the claims do not satisfy the schema,
    /// and key or signing errors from the provider.
    pub fn create(&self, claims: &ClaimSet) -> TokenResult<String> {
        let inner = &*self.inner;
        inner.schema.validate(claims)?;

        let now = inner.clock.now();
        let expires_at = now
            .checked_add_signed(inner.window)
            .ok_or_else(|| TokenError::configuration("token expiry is out of range"))?;

        let mut payload = Map::new();
        payload.insert("iss".into(), Value::String(inner.issuer.clone()));
        payload.insert("iat".into(), Value::from(now.timestamp()));
        payload.insert("exp".into(), Value::from(expires_at.timestamp()));
        for (name, value) in claims.iter() {
            payload.insert(name.to_string(), codec::encode_claim(name, value)?);
        }
        let jti = new_token_id();
        payload.insert("jti".into(), Value::String(jti.clone()));

        let algorithm = inner.provider.get()?;
        let header = TokenHeader::new(algorithm.name(), algorithm.key_id());
        let token = jws::encode(&header, &payload, &*algorithm)?;

        debug!(
            jti = %jti,
            alg = algorithm.name(),
            claims = claims.len(),
            "issued token"
        );
        Ok(token)
    }

    /// Verify a token's structure, algorithm, signature, issuer and
    /// validity window.
    ///
    /// # Errors
    /// Returns `TokenError::Verification` with the reason the token was
    /// rejected, or a key error from the provider.
    pub fn verify(&self, token: &str) -> TokenResult<DecodedToken> {
        let algorithm = self.inner.provider.get()?;
        let result = self.check(token, &*algorithm);

        match &result {
            Ok(decoded) => debug!(
                jti = decoded.token_id().unwrap_or("-"),
                alg = algorithm.name(),
                "verified token"
            ),
            Err(TokenError::Verification(reason)) => {
                warn!(reason = %reason, alg = algorithm.name(), "rejected token");
            }
            Err(_) => {}
        }
        result
    }

    fn check(&self, token: &str, algorithm: &dyn SigningAlgorithm) -> TokenResult<DecodedToken> {
        let segments = Segments::split(token)?;
        let header: TokenHeader = jws::decode_json(segments.header, "header")?;
        let claims: Map<String, Value> = jws::decode_json(segments.payload, "payload")?;

        if header.alg != algorithm.name() {
            return Err(VerificationError::AlgorithmMismatch {
                expected: algorithm.name().to_string(),
                found: header.alg,
            }
            .into());
        }

        let signature = segments.signature_bytes()?;
        if !algorithm.verify(segments.signing_input(), &signature)? {
            return Err(VerificationError::InvalidSignature.into());
        }

        RegisteredClaims {
            issuer: &self.inner.issuer,
            leeway_seconds: self.inner.leeway_seconds,
        }
        .check(&claims, self.inner.clock.now().timestamp())?;

        Ok(DecodedToken::new(token.to_string(), header, claims))
    }

    /// Extract the declared claims of a verified token as typed values.
    ///
    /// Timestamps come back at second granularity. Absent or `null` claims
    /// are omitted. Claims whose JSON value does not fit the declared type
    /// are omitted and logged. Undeclared claims are dropped.
    #[must_use]
    pub fn parse_payload(&self, decoded: &DecodedToken) -> ClaimSet {
        self.inner
            .schema
            .fields()
            .filter_map(|(name, field_type)| {
                let raw = decoded.claim(name).filter(|v| !v.is_null())?;
                let value = codec::decode_claim(raw, field_type);
                if value.is_none() {
                    warn!(
                        claim = name,
                        expected = %field_type,
                        "claim does not decode as its declared type, omitted"
                    );
                }
                value.map(|v| (name, v))
            })
            .collect()
    }

    /// [`verify`](Self::verify) then [`parse_payload`](Self::parse_payload).
    ///
    /// # Errors
    /// Returns the errors of [`verify`](Self::verify).
    pub fn verify_and_parse_payload(&self, token: &str) -> TokenResult<ClaimSet> {
        let decoded = self.verify(token)?;
        Ok(self.parse_payload(&decoded))
    }

    /// Configured issuer
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.inner.issuer
    }

    /// Claim schema
    #[must_use]
    pub fn schema(&self) -> &ClaimSchema {
        &self.inner.schema
    }

    /// Token lifetime
    #[must_use]
    pub fn expires_in(&self) -> Duration {
        self.inner.window
    }

    /// Tolerated clock skew in seconds
    #[must_use]
    pub fn leeway_seconds(&self) -> i64 {
        self.inner.leeway_seconds
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("issuer", &self.inner.issuer)
            .field("schema", &self.inner.schema)
            .field("expires_in", &self.inner.window)
            .field("leeway_seconds", &self.inner.leeway_seconds)
            .finish_non_exhaustive()
    }
}

/// Fresh random token ID: UUIDv4 as 32 lowercase hex characters
fn new_token_id() -> String {
    Uuid::new_v4().simple().to_string()
}
