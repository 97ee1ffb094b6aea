//! Drop-in byte stream over a [`BlockingAcquirer`].
//!
//! [`QuantumReader`] can stand in wherever a `std::io::Read` or a
//! `rand_core` generator of random bytes is expected.

use qrand_transport::{HyperTransport, Transport};
use qrand_types::Quality;
use rand_core::{CryptoRng, RngCore};
use std::io;
use zeroize::Zeroizing;

use crate::acquirer::Acquisition;
use crate::blocking::BlockingAcquirer;
use crate::config::AcquirerConfig;
use crate::error::{AcquireError, EntropyResult};
use crate::fallback::{FallbackSource, OsFallback};

pub struct QuantumReader<T = HyperTransport, F = OsFallback> {
    acquirer: BlockingAcquirer<T, F>,
}

impl QuantumReader {
    /// Reader over the default service and the OS fallback.
    pub fn new() -> EntropyResult<Self> {
        Self::from_config(AcquirerConfig::default())
    }

    pub fn from_config(config: AcquirerConfig) -> EntropyResult<Self> {
        Ok(Self::with_acquirer(BlockingAcquirer::from_config(config)?))
    }
}

impl<T: Transport, F: FallbackSource> QuantumReader<T, F> {
    pub fn with_acquirer(acquirer: BlockingAcquirer<T, F>) -> Self {
        Self { acquirer }
    }

    pub fn acquirer(&self) -> &BlockingAcquirer<T, F> {
        &self.acquirer
    }

    /// Fill all of `buf` and report where the bytes came from.
    ///
    /// An empty buffer is filled trivially, without any I/O.
    pub fn read_with_quality(&self, buf: &mut [u8]) -> EntropyResult<(usize, Quality)> {
        if buf.is_empty() {
            return Ok((0, Quality::True));
        }
        let (bytes, quality) = self.acquirer.acquire(buf.len()).into_parts()?;
        let bytes = Zeroizing::new(bytes);
        buf.copy_from_slice(&bytes);
        Ok((buf.len(), quality))
    }

    fn fill_strict(&self, buf: &mut [u8]) -> EntropyResult<()> {
        if buf.is_empty() {
            return Ok(());
        }
        match self.acquirer.acquire(buf.len()) {
            Acquisition::Success(bytes) => {
                let bytes = Zeroizing::new(bytes);
                buf.copy_from_slice(&bytes);
                Ok(())
            }
            Acquisition::Degraded(d) => {
                let bytes = Zeroizing::new(d.bytes);
                buf.copy_from_slice(&bytes);
                Err(AcquireError::Degraded {
                    remote_len: d.remote_len,
                    cause: d.cause,
                })
            }
            Acquisition::Failed(e) => Err(e),
        }
    }
}

/// A degraded read still fills the whole buffer, but returns an error whose
/// inner value is [`AcquireError::Degraded`]. Callers that accept
/// pseudo-random bytes should use [`QuantumReader::read_with_quality`].
impl<T: Transport, F: FallbackSource> io::Read for QuantumReader<T, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.fill_strict(buf).map_err(into_io_error)?;
        Ok(buf.len())
    }
}

fn into_io_error(err: AcquireError) -> io::Error {
    let kind = match err {
        AcquireError::InvalidSize(_) => io::ErrorKind::InvalidInput,
        _ => io::ErrorKind::Other,
    };
    io::Error::new(kind, err)
}

/// `fill_bytes` accepts degraded output and panics only if no generator at
/// all can produce bytes. `try_fill_bytes` treats degraded output as an error.
impl<T: Transport, F: FallbackSource> RngCore for QuantumReader<T, F> {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(e) = self.read_with_quality(dest) {
            // A generator that cannot produce bytes has no safe way to continue.
            panic!("no entropy source available: {e}");
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_strict(dest).map_err(rand_core::Error::new)
    }
}

impl<T: Transport, F: FallbackSource> CryptoRng for QuantumReader<T, F> {}
