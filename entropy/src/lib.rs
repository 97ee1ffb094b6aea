//! True random bytes from the ANU quantum random number service, with a
//! local CSPRNG taking over whenever the service cannot deliver.
//!
//! ```no_run
//! use qrand_entropy::{Acquisition, BlockingAcquirer, AcquirerConfig};
//!
//! let acquirer = BlockingAcquirer::from_config(AcquirerConfig::default())?;
//! match acquirer.acquire(32) {
//!     Acquisition::Success(bytes) => println!("quantum: {bytes:02x?}"),
//!     Acquisition::Degraded(d) => println!("fallback after {} bytes: {}", d.remote_len, d.cause),
//!     Acquisition::Failed(e) => eprintln!("no entropy: {e}"),
//! }
//! # Ok::<(), qrand_entropy::AcquireError>(())
//! ```

pub mod acquirer;
pub mod batch;
pub mod blocking;
pub mod config;
pub mod error;
pub mod fallback;
pub mod reader;
pub mod retry;

#[cfg(test)]
mod testing;

pub use acquirer::{Acquisition, Degraded, RandomAcquirer};
pub use blocking::BlockingAcquirer;
pub use config::{AcquirerConfig, ConfigError, DEFAULT_ENDPOINT};
pub use error::{AcquireError, BatchError, EntropyResult, FallbackError};
pub use fallback::{FallbackSource, OsFallback, RngFallback};
pub use qrand_types::{ErrorCode, ItemEncoding, PacketShape, Quality};
pub use reader::QuantumReader;
pub use retry::{RetryError, RetryPolicy};

/// Acquire `size` bytes with the default configuration, blocking the caller.
///
/// # Panics
///
/// Panics when called from inside a tokio runtime, because the call drives
/// its own runtime to completion. Async callers should hold a
/// [`RandomAcquirer`] and await [`RandomAcquirer::acquire`] instead.
pub fn get(size: usize) -> Acquisition {
    if size == 0 {
        return Acquisition::Failed(AcquireError::InvalidSize(size));
    }
    match BlockingAcquirer::from_config(AcquirerConfig::default()) {
        Ok(acquirer) => acquirer.acquire(size),
        Err(e) => Acquisition::Failed(e),
    }
}
