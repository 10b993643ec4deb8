//! Builder for [`TokenManager`]

use super::{Inner, TokenManager};
use crate::clock::{Clock, SystemClock};
use crate::error::{TokenError, TokenResult};
use crate::provider::AlgorithmProvider;
use crate::schema::ClaimSchema;
use chrono::Duration;
use std::sync::Arc;
use tracing::debug;

/// Default token lifetime
pub const DEFAULT_EXPIRES_IN_MINUTES: i64 = 1440;

/// Builder for [`TokenManager`].
pub struct TokenManagerBuilder {
    issuer: String,
    schema: ClaimSchema,
    expires_in_minutes: i64,
    leeway_seconds: i64,
    provider: Option<Arc<dyn AlgorithmProvider>>,
    clock: Arc<dyn Clock>,
}

impl TokenManagerBuilder {
    pub(super) fn new(issuer: String, schema: ClaimSchema) -> Self {
        Self {
            issuer,
            schema,
            expires_in_minutes: DEFAULT_EXPIRES_IN_MINUTES,
            leeway_seconds: 0,
            provider: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Token lifetime in minutes
    #[must_use]
    pub fn expires_in_minutes(mut self, minutes: i64) -> Self {
        self.expires_in_minutes = minutes;
        self
    }

    /// Clock skew tolerated when checking `exp`, `nbf` and `iat`
    #[must_use]
    pub fn leeway_seconds(mut self, seconds: i64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Source of the signing algorithm
    #[must_use]
    pub fn provider(mut self, provider: impl AlgorithmProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Time source, [`SystemClock`] unless set
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Finish the manager. The provider is asked for its algorithm once so
    /// that missing key material is reported here rather than on first use.
    ///
    /// # Errors
    /// Returns `TokenError::Configuration` for a missing provider, an empty
    /// issuer, or a negative or unrepresentable lifetime or leeway, and the
    /// provider's error if it cannot supply an algorithm.
    pub fn build(self) -> TokenResult<TokenManager> {
        let provider = self
            .provider
            .ok_or_else(|| TokenError::configuration("no algorithm provider set"))?;

        if self.issuer.is_empty() {
            return Err(TokenError::configuration("issuer must not be empty"));
        }
        if self.expires_in_minutes < 0 {
            return Err(TokenError::configuration(
                "expires_in_minutes must not be negative",
            ));
        }
        if self.leeway_seconds < 0 {
            return Err(TokenError::configuration(
                "leeway_seconds must not be negative",
            ));
        }
        let window = Duration::try_minutes(self.expires_in_minutes)
            .ok_or_else(|| TokenError::configuration("expires_in_minutes is out of range"))?;

        let algorithm = provider.get()?;
        debug!(
            issuer = %self.issuer,
            alg = algorithm.name(),
            fields = self.schema.len(),
            expires_in_minutes = self.expires_in_minutes,
            "token manager ready"
        );

        Ok(TokenManager {
            inner: Arc::new(Inner {
                issuer: self.issuer,
                schema: self.schema,
                window,
                leeway_seconds: self.leeway_seconds,
                provider,
                clock: self.clock,
            }),
        })
    }
}
