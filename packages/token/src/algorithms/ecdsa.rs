//! ECDSA P-256 (ES256)
//!
//! Signatures use the fixed-width JOSE encoding (`r || s`, 64 bytes),
//! not ASN.1 DER.

use super::SigningAlgorithm;
use crate::error::{TokenError, TokenResult};
use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rand::Rng;
use std::fmt;
use zeroize::Zeroizing;

/// ES256 signing algorithm.
pub struct EcdsaAlgorithm {
    signing_key: Option<SigningKey>,
    verifying_key: VerifyingKey,
    key_id: Option<String>,
}

impl EcdsaAlgorithm {
    /// Create from a signing key
    #[must_use]
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key().clone();
        Self {
            signing_key: Some(signing_key),
            verifying_key,
            key_id: None,
        }
    }

    /// Create a verify-only algorithm
    #[must_use]
    pub fn from_verifying_key(verifying_key: VerifyingKey) -> Self {
        Self {
            signing_key: None,
            verifying_key,
            key_id: None,
        }
    }

    /// Create from a raw 32-byte private scalar.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the bytes are not a valid scalar.
    pub fn from_private_bytes(bytes: &[u8]) -> TokenResult<Self> {
        let key = SigningKey::from_slice(bytes)
            .map_err(|_| TokenError::key_material("Invalid P-256 private key bytes"))?;
        Ok(Self::from_signing_key(key))
    }

    /// Create from a PKCS#8 PEM private key.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the PEM cannot be parsed.
    pub fn from_private_pem(pem: &str) -> TokenResult<Self> {
        let key = SigningKey::from_pkcs8_pem(pem)
            .map_err(|_| TokenError::key_material("Invalid PKCS8 PEM private key"))?;
        Ok(Self::from_signing_key(key))
    }

    /// Create a verify-only algorithm from an SPKI PEM public key.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the PEM cannot be parsed.
    pub fn from_public_pem(pem: &str) -> TokenResult<Self> {
        let key = VerifyingKey::from_public_key_pem(pem)
            .map_err(|_| TokenError::key_material("Invalid PEM public key"))?;
        Ok(Self::from_verifying_key(key))
    }

    /// Create a verify-only algorithm from a SEC1 point (33 or 65 bytes).
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the bytes are not a curve point.
    pub fn from_public_bytes(bytes: &[u8]) -> TokenResult<Self> {
        let key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| TokenError::key_material("Invalid SEC1 public key bytes"))?;
        Ok(Self::from_verifying_key(key))
    }

    /// Generate a fresh key pair from system entropy.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if no valid scalar could be drawn.
    pub fn generate() -> TokenResult<Self> {
        let mut rng = rand::rng();
        // Out-of-range scalars are astronomically rare; retry a few times anyway
        for _ in 0..4 {
            let mut bytes = Zeroizing::new([0u8; 32]);
            rng.fill(&mut bytes[..]);
            if let Ok(key) = SigningKey::from_slice(&bytes[..]) {
                return Ok(Self::from_signing_key(key));
            }
        }
        Err(TokenError::key_material("Failed to generate a P-256 key"))
    }

    /// Attach a key ID hint
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Public half as an uncompressed SEC1 point
    #[must_use]
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.verifying_key.to_encoded_point(false).as_bytes().to_vec()
    }

    /// Verify-only copy of this algorithm
    #[must_use]
    pub fn verifier(&self) -> Self {
        Self {
            signing_key: None,
            verifying_key: self.verifying_key.clone(),
            key_id: self.key_id.clone(),
        }
    }
}

impl fmt::Debug for EcdsaAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaAlgorithm")
            .field("alg", &"ES256")
            .field("can_sign", &self.signing_key.is_some())
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl SigningAlgorithm for EcdsaAlgorithm {
    fn name(&self) -> &'static str {
        "ES256"
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn sign(&self, message: &[u8]) -> TokenResult<Vec<u8>> {
        let key = self
            .signing_key
            .as_ref()
            .ok_or_else(|| TokenError::signing("ES256 instance holds only a public key"))?;
        let signature: Signature = key
            .try_sign(message)
            .map_err(|e| TokenError::Signing(format!("ECDSA signing failed: {e}")))?;
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> TokenResult<bool> {
        let Ok(signature) = Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(self.verifying_key.verify(message, &signature).is_ok())
    }
}
