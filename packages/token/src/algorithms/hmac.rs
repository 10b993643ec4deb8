//! HMAC-based algorithms (HS256, HS384, HS512)

use super::SigningAlgorithm;
use crate::error::{TokenError, TokenResult};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Hash function behind an HMAC algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HmacHash {
    /// HS256
    Sha256,
    /// HS384
    Sha384,
    /// HS512
    Sha512,
}

impl HmacHash {
    /// JOSE algorithm name
    #[must_use]
    pub const fn alg(self) -> &'static str {
        match self {
            HmacHash::Sha256 => "HS256",
            HmacHash::Sha384 => "HS384",
            HmacHash::Sha512 => "HS512",
        }
    }

    /// Minimum secret length in bytes (the hash output size)
    #[must_use]
    pub const fn min_key_len(self) -> usize {
        match self {
            HmacHash::Sha256 => 32,
            HmacHash::Sha384 => 48,
            HmacHash::Sha512 => 64,
        }
    }
}

/// HMAC signing algorithm over a shared secret.
///
/// The secret is zeroized when the algorithm is dropped.
pub struct HmacAlgorithm {
    hash: HmacHash,
    secret: Zeroizing<Vec<u8>>,
    key_id: Option<String>,
}

impl HmacAlgorithm {
    /// Create an HMAC algorithm.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the secret is shorter than the
    /// hash output.
    pub fn new(hash: HmacHash, secret: impl Into<Vec<u8>>) -> TokenResult<Self> {
        let secret = Zeroizing::new(secret.into());
        if secret.len() < hash.min_key_len() {
            return Err(TokenError::KeyMaterial(format!(
                "HMAC key for {} must be at least {} bytes, got {}",
                hash.alg(),
                hash.min_key_len(),
                secret.len()
            )));
        }
        Ok(Self {
            hash,
            secret,
            key_id: None,
        })
    }

    /// HS256 with the given secret.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the secret is shorter than 32 bytes.
    pub fn hs256(secret: impl Into<Vec<u8>>) -> TokenResult<Self> {
        Self::new(HmacHash::Sha256, secret)
    }

    /// HS384 with the given secret.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the secret is shorter than 48 bytes.
    pub fn hs384(secret: impl Into<Vec<u8>>) -> TokenResult<Self> {
        Self::new(HmacHash::Sha384, secret)
    }

    /// HS512 with the given secret.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the secret is shorter than 64 bytes.
    pub fn hs512(secret: impl Into<Vec<u8>>) -> TokenResult<Self> {
        Self::new(HmacHash::Sha512, secret)
    }

    /// Generate a random secret of the minimum length for `hash`
    #[must_use]
    pub fn generate(hash: HmacHash) -> Self {
        let mut secret = Zeroizing::new(vec![0u8; hash.min_key_len()]);
        rand::rng().fill(&mut secret[..]);
        Self {
            hash,
            secret,
            key_id: None,
        }
    }

    /// Attach a key ID hint
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Hash function in use
    #[must_use]
    pub fn hash(&self) -> HmacHash {
        self.hash
    }
}

impl fmt::Debug for HmacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacAlgorithm")
            .field("alg", &self.hash.alg())
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl SigningAlgorithm for HmacAlgorithm {
    fn name(&self) -> &'static str {
        self.hash.alg()
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn sign(&self, message: &[u8]) -> TokenResult<Vec<u8>> {
        match self.hash {
            HmacHash::Sha256 => sign_with::<HmacSha256>(&self.secret, message),
            HmacHash::Sha384 => sign_with::<HmacSha384>(&self.secret, message),
            HmacHash::Sha512 => sign_with::<HmacSha512>(&self.secret, message),
        }
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> TokenResult<bool> {
        match self.hash {
            HmacHash::Sha256 => verify_with::<HmacSha256>(&self.secret, message, signature),
            HmacHash::Sha384 => verify_with::<HmacSha384>(&self.secret, message, signature),
            HmacHash::Sha512 => verify_with::<HmacSha512>(&self.secret, message, signature),
        }
    }
}

fn keyed<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> TokenResult<M> {
    let mut mac = <M as KeyInit>::new_from_slice(secret)
        .map_err(|_| TokenError::key_material("Invalid HMAC key"))?;
    mac.update(message);
    Ok(mac)
}

fn sign_with<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> TokenResult<Vec<u8>> {
    Ok(keyed::<M>(secret, message)?.finalize().into_bytes().to_vec())
}

/// Constant-time comparison via `Mac::verify_slice`
fn verify_with<M: Mac + KeyInit>(
    secret: &[u8],
    message: &[u8],
    signature: &[u8],
) -> TokenResult<bool> {
    Ok(keyed::<M>(secret, message)?.verify_slice(signature).is_ok())
}
