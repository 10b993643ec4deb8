//! Registered claim checks applied after the signature is verified.

use crate::error::VerificationError;
use crate::token;
use serde_json::{Map, Value};

/// Issuer, expiry and validity window settings for one manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegisteredClaims<'a> {
    pub(crate) issuer: &'a str,
    pub(crate) leeway_seconds: i64,
}

impl RegisteredClaims<'_> {
    /// Check `iss`, then `exp`, then `nbf` and `iat` when present
    pub(crate) fn check(
        &self,
        claims: &Map<String, Value>,
        now: i64,
    ) -> Result<(), VerificationError> {
        self.check_issuer(claims)?;
        self.check_time(claims, now)
    }

    fn check_issuer(&self, claims: &Map<String, Value>) -> Result<(), VerificationError> {
        match claims.get("iss").and_then(Value::as_str) {
            Some(iss) if iss == self.issuer => Ok(()),
            found => Err(VerificationError::InvalidIssuer {
                expected: self.issuer.to_string(),
                found: found.map(str::to_string),
            }),
        }
    }

    fn check_time(&self, claims: &Map<String, Value>, now: i64) -> Result<(), VerificationError> {
        let exp = numeric_date(claims, "exp")?.ok_or(VerificationError::MissingClaim("exp"))?;
        if now > exp.saturating_add(self.leeway_seconds) {
            return Err(VerificationError::Expired { expired_at: exp });
        }

        if let Some(nbf) = numeric_date(claims, "nbf")?
            && nbf > now.saturating_add(self.leeway_seconds)
        {
            return Err(VerificationError::NotYetValid { not_before: nbf });
        }

        if let Some(iat) = numeric_date(claims, "iat")?
            && iat > now.saturating_add(self.leeway_seconds)
        {
            return Err(VerificationError::IssuedInFuture { issued_at: iat });
        }

        Ok(())
    }
}

/// Read a NumericDate claim. Absent is `None`; present but not a number
/// is an error.
fn numeric_date(
    claims: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<i64>, VerificationError> {
    match claims.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => token::numeric_date(value)
            .map(Some)
            .ok_or(VerificationError::InvalidNumericDate(name)),
    }
}
