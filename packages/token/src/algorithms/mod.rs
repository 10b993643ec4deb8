//! Signing algorithms.
//!
//! A [`SigningAlgorithm`] signs and verifies the JWS signing input with one
//! key. The manager never touches key material directly; it obtains an
//! [`AlgorithmHandle`] from an [`AlgorithmProvider`](crate::AlgorithmProvider)
//! and uses the same handle for signing and verification.

pub mod ecdsa;
pub mod hmac;
pub mod rsa;

pub use ecdsa::EcdsaAlgorithm;
pub use hmac::HmacAlgorithm;
pub use rsa::RsaAlgorithm;

use crate::error::TokenResult;
use std::sync::Arc;

/// Shared, ready-to-use algorithm instance.
pub type AlgorithmHandle = Arc<dyn SigningAlgorithm>;

/// Signing algorithm interface.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait SigningAlgorithm: Send + Sync {
    /// Header `alg` value.
    fn name(&self) -> &'static str;

    /// Key ID hint written into the header.
    fn key_id(&self) -> Option<&str> {
        None
    }

    /// Sign the signing input (`base64url(header).base64url(payload)`).
    ///
    /// # Errors
    /// Returns `TokenError` if the key cannot sign.
    fn sign(&self, message: &[u8]) -> TokenResult<Vec<u8>>;

    /// Check a signature over the signing input. `Ok(false)` means the
    /// signature does not match.
    ///
    /// # Errors
    /// Returns `TokenError` if the key cannot verify.
    fn verify(&self, message: &[u8], signature: &[u8]) -> TokenResult<bool>;
}

impl<T: SigningAlgorithm + ?Sized> SigningAlgorithm for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn key_id(&self) -> Option<&str> {
        (**self).key_id()
    }

    fn sign(&self, message: &[u8]) -> TokenResult<Vec<u8>> {
        (**self).sign(message)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> TokenResult<bool> {
        (**self).verify(message, signature)
    }
}
