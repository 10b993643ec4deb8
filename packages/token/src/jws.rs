//! JWS compact serialization: `base64url(header).base64url(payload).base64url(signature)`

use crate::algorithms::SigningAlgorithm;
use crate::error::{TokenError, TokenResult, VerificationError};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Base64 URL-safe encoding without padding (RFC 7515)
#[inline]
pub(crate) fn base64_url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding (RFC 7515)
#[inline]
pub(crate) fn base64_url_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(input)
}

/// Serialize header and payload, sign, and join into a compact token
pub(crate) fn encode<H, P>(
    header: &H,
    payload: &P,
    algorithm: &dyn SigningAlgorithm,
) -> TokenResult<String>
where
    H: Serialize + ?Sized,
    P: Serialize + ?Sized,
{
    let header_json = serde_json::to_vec(header)
        .map_err(|e| TokenError::Signing(format!("header encoding failed: {e}")))?;
    let payload_json = serde_json::to_vec(payload)
        .map_err(|e| TokenError::Signing(format!("payload encoding failed: {e}")))?;

    let header_b64 = base64_url_encode(&header_json);
    let payload_b64 = base64_url_encode(&payload_json);

    let mut token = String::with_capacity(header_b64.len() + 1 + payload_b64.len());
    token.push_str(&header_b64);
    token.push('.');
    token.push_str(&payload_b64);

    let signature = algorithm.sign(token.as_bytes())?;
    token.push('.');
    token.push_str(&base64_url_encode(&signature));

    Ok(token)
}

/// The three segments of a compact token, still encoded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segments<'a> {
    pub(crate) header: &'a str,
    pub(crate) payload: &'a str,
    pub(crate) signature: &'a str,
    signing_input: &'a str,
}

impl<'a> Segments<'a> {
    /// Split a compact token into its segments
    pub(crate) fn split(token: &'a str) -> Result<Self, VerificationError> {
        let (signing_input, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| VerificationError::Malformed("expected three segments".into()))?;
        let (header, payload) = signing_input
            .split_once('.')
            .ok_or_else(|| VerificationError::Malformed("expected three segments".into()))?;

        if payload.contains('.') {
            return Err(VerificationError::Malformed(
                "expected three segments".into(),
            ));
        }
        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(VerificationError::Malformed("empty segment".into()));
        }

        Ok(Self {
            header,
            payload,
            signature,
            signing_input,
        })
    }

    /// `header.payload`, the bytes the signature covers
    pub(crate) fn signing_input(&self) -> &'a [u8] {
        self.signing_input.as_bytes()
    }

    /// Decode the signature bytes
    pub(crate) fn signature_bytes(&self) -> Result<Vec<u8>, VerificationError> {
        base64_url_decode(self.signature)
            .map_err(|_| VerificationError::Malformed("invalid signature encoding".into()))
    }
}

/// Decode one encoded segment as JSON
pub(crate) fn decode_json<T: DeserializeOwned>(
    segment: &str,
    what: &str,
) -> Result<T, VerificationError> {
    let bytes = base64_url_decode(segment)
        .map_err(|_| VerificationError::Malformed(format!("invalid {what} encoding")))?;
    serde_json::from_slice(&bytes)
        .map_err(|_| VerificationError::Malformed(format!("invalid {what} JSON")))
}
