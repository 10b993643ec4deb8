//! RSA PKCS#1 v1.5 algorithms (RS256, RS384, RS512)

use super::SigningAlgorithm;
use crate::error::{TokenError, TokenResult};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;

/// Minimum accepted modulus size
const MIN_MODULUS_BITS: usize = 2048;

/// Hash function behind an RSA algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsaHash {
    /// RS256
    Sha256,
    /// RS384
    Sha384,
    /// RS512
    Sha512,
}

impl RsaHash {
    /// JOSE algorithm name
    #[must_use]
    pub const fn alg(self) -> &'static str {
        match self {
            RsaHash::Sha256 => "RS256",
            RsaHash::Sha384 => "RS384",
            RsaHash::Sha512 => "RS512",
        }
    }
}

/// RSA signing algorithm.
///
/// Built from a private key it signs and verifies; built from a public key
/// alone it only verifies.
pub struct RsaAlgorithm {
    hash: RsaHash,
    private_key: Option<RsaPrivateKey>,
    public_key: RsaPublicKey,
    key_id: Option<String>,
}

impl RsaAlgorithm {
    /// Create from a private key; the public half is derived from it.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the modulus is under 2048 bits.
    pub fn from_private_key(hash: RsaHash, private_key: RsaPrivateKey) -> TokenResult<Self> {
        let public_key = private_key.to_public_key();
        check_modulus(&public_key)?;
        Ok(Self {
            hash,
            private_key: Some(private_key),
            public_key,
            key_id: None,
        })
    }

    /// Create a verify-only algorithm from a public key.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the modulus is under 2048 bits.
    pub fn from_public_key(hash: RsaHash, public_key: RsaPublicKey) -> TokenResult<Self> {
        check_modulus(&public_key)?;
        Ok(Self {
            hash,
            private_key: None,
            public_key,
            key_id: None,
        })
    }

    /// Create from a PKCS#8 PEM private key (`BEGIN PRIVATE KEY`).
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the PEM cannot be parsed.
    pub fn from_private_pem(hash: RsaHash, pem: &str) -> TokenResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| TokenError::KeyMaterial(format!("Invalid RSA private key: {e}")))?;
        Self::from_private_key(hash, key)
    }

    /// Create from a PKCS#8 DER private key.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the DER cannot be parsed.
    pub fn from_private_der(hash: RsaHash, der: &[u8]) -> TokenResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| TokenError::KeyMaterial(format!("Invalid RSA private key: {e}")))?;
        Self::from_private_key(hash, key)
    }

    /// Create a verify-only algorithm from an SPKI PEM public key
    /// (`BEGIN PUBLIC KEY`).
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the PEM cannot be parsed.
    pub fn from_public_pem(hash: RsaHash, pem: &str) -> TokenResult<Self> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| TokenError::KeyMaterial(format!("Invalid RSA public key: {e}")))?;
        Self::from_public_key(hash, key)
    }

    /// RS256 from a PKCS#8 PEM private key.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the PEM cannot be parsed.
    pub fn rs256_from_pem(pem: &str) -> TokenResult<Self> {
        Self::from_private_pem(RsaHash::Sha256, pem)
    }

    /// Attach a key ID hint
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Whether this instance holds a private key
    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.private_key.is_some()
    }

    fn private_key(&self) -> TokenResult<RsaPrivateKey> {
        self.private_key.clone().ok_or_else(|| {
            TokenError::signing(&format!("{} instance holds only a public key", self.hash.alg()))
        })
    }
}

impl fmt::Debug for RsaAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaAlgorithm")
            .field("alg", &self.hash.alg())
            .field("can_sign", &self.can_sign())
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl SigningAlgorithm for RsaAlgorithm {
    fn name(&self) -> &'static str {
        self.hash.alg()
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn sign(&self, message: &[u8]) -> TokenResult<Vec<u8>> {
        let key = self.private_key()?;
        let signature = match self.hash {
            RsaHash::Sha256 => SigningKey::<Sha256>::new(key).try_sign(message),
            RsaHash::Sha384 => SigningKey::<Sha384>::new(key).try_sign(message),
            RsaHash::Sha512 => SigningKey::<Sha512>::new(key).try_sign(message),
        }
        .map_err(|e| TokenError::Signing(format!("RSA signing failed: {e}")))?;
        Ok(signature.to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> TokenResult<bool> {
        let Ok(signature) = Signature::try_from(signature) else {
            return Ok(false);
        };
        let key = self.public_key.clone();
        let verified = match self.hash {
            RsaHash::Sha256 => VerifyingKey::<Sha256>::new(key).verify(message, &signature),
            RsaHash::Sha384 => VerifyingKey::<Sha384>::new(key).verify(message, &signature),
            RsaHash::Sha512 => VerifyingKey::<Sha512>::new(key).verify(message, &signature),
        };
        Ok(verified.is_ok())
    }
}

fn check_modulus(key: &RsaPublicKey) -> TokenResult<()> {
    use rsa::traits::PublicKeyParts;

    let bits = key.n().bits();
    if bits < MIN_MODULUS_BITS {
        return Err(TokenError::KeyMaterial(format!(
            "RSA modulus must be at least {MIN_MODULUS_BITS} bits, got {bits}"
        )));
    }
    Ok(())
}
