//! Algorithm providers: where the manager gets its signing key from.

use crate::algorithms::{AlgorithmHandle, HmacAlgorithm, SigningAlgorithm};
use crate::error::TokenResult;
use std::fmt;
use std::sync::Arc;

/// Supplies the algorithm instance used to sign and verify tokens.
///
/// Called on every `create` and `verify`, so implementations backed by an
/// external key store should cache.
pub trait AlgorithmProvider: Send + Sync {
    /// Fetch the current algorithm.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if no key is available.
    fn get(&self) -> TokenResult<AlgorithmHandle>;
}

impl<P: AlgorithmProvider + ?Sized> AlgorithmProvider for Arc<P> {
    fn get(&self) -> TokenResult<AlgorithmHandle> {
        (**self).get()
    }
}

/// Provider holding a single fixed algorithm instance.
#[derive(Clone)]
pub struct StaticProvider {
    handle: AlgorithmHandle,
}

impl StaticProvider {
    /// Wrap an algorithm
    #[must_use]
    pub fn new(algorithm: impl SigningAlgorithm + 'static) -> Self {
        Self {
            handle: Arc::new(algorithm),
        }
    }

    /// Wrap an existing handle
    #[must_use]
    pub fn from_handle(handle: AlgorithmHandle) -> Self {
        Self { handle }
    }

    /// HS256 over a shared secret.
    ///
    /// # Errors
    /// Returns `TokenError::KeyMaterial` if the secret is shorter than 32 bytes.
    pub fn hs256(secret: impl Into<Vec<u8>>) -> TokenResult<Self> {
        Ok(Self::new(HmacAlgorithm::hs256(secret)?))
    }
}

impl fmt::Debug for StaticProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticProvider")
            .field("alg", &self.handle.name())
            .finish()
    }
}

impl AlgorithmProvider for StaticProvider {
    fn get(&self) -> TokenResult<AlgorithmHandle> {
        Ok(Arc::clone(&self.handle))
    }
}

/// Provider backed by a closure, for custom key retrieval.
pub struct FnProvider<F> {
    fetch: F,
}

impl<F> FnProvider<F>
where
    F: Fn() -> TokenResult<AlgorithmHandle> + Send + Sync,
{
    /// Wrap a key retrieval closure
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

impl<F> fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider").finish_non_exhaustive()
    }
}

impl<F> AlgorithmProvider for FnProvider<F>
where
    F: Fn() -> TokenResult<AlgorithmHandle> + Send + Sync,
{
    fn get(&self) -> TokenResult<AlgorithmHandle> {
        (self.fetch)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, TokenError};

    #[test]
    fn test_static_provider_shares_one_instance() {
        let provider = StaticProvider::hs256(vec![7u8; 32]).unwrap();
        let a = provider.get().unwrap();
        let b = provider.get().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "HS256");
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let err = StaticProvider::hs256(b"short".to_vec()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_fn_provider_surfaces_key_errors() {
        let provider = FnProvider::new(|| Err(TokenError::key_material("vault sealed")));
        assert!(matches!(provider.get(), Err(TokenError::KeyMaterial(_))));
    }
}
