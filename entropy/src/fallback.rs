//! Local generators used when the remote service cannot supply bytes.

use rand_core::{CryptoRng, RngCore};
use std::sync::Mutex;

use crate::error::FallbackError;

/// A cryptographically secure local byte source.
pub trait FallbackSource: Send + Sync {
    /// Fill `dest` and return how many bytes were written.
    ///
    /// Writing fewer than `dest.len()` bytes fails the acquisition.
    fn fill(&self, dest: &mut [u8]) -> Result<usize, FallbackError>;
}

/// OS-backed CSPRNG via `getrandom::fill()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFallback;

impl FallbackSource for OsFallback {
    fn fill(&self, dest: &mut [u8]) -> Result<usize, FallbackError> {
        getrandom::fill(dest).map_err(FallbackError::Os)?;
        Ok(dest.len())
    }
}

/// Adapter for any `rand_core` generator that is marked cryptographically secure.
pub struct RngFallback<R> {
    rng: Mutex<R>,
}

impl<R: RngCore + CryptoRng + Send> RngFallback<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl<R: RngCore + CryptoRng + Send> FallbackSource for RngFallback<R> {
    fn fill(&self, dest: &mut [u8]) -> Result<usize, FallbackError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| FallbackError::Rng("generator lock poisoned".into()))?;
        rng.try_fill_bytes(dest)
            .map_err(|e| FallbackError::Rng(e.to_string()))?;
        Ok(dest.len())
    }
}
