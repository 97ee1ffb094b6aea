use qrand_transport::{HyperTransport, Transport};
use tokio::runtime::{Builder, Runtime};

use crate::acquirer::{Acquisition, RandomAcquirer};
use crate::config::AcquirerConfig;
use crate::error::EntropyResult;
use crate::fallback::{FallbackSource, OsFallback};

/// Synchronous wrapper driving a [`RandomAcquirer`] on a private runtime.
///
/// Retry sleeps block the calling thread. Must not be used from inside an
/// async context; use [`RandomAcquirer::acquire`] there instead.
pub struct BlockingAcquirer<T = HyperTransport, F = OsFallback> {
    inner: RandomAcquirer<T, F>,
    runtime: Runtime,
}

impl BlockingAcquirer {
    pub fn from_config(config: AcquirerConfig) -> EntropyResult<Self> {
        let runtime = current_thread()?;
        let inner = {
            let _guard = runtime.enter();
            RandomAcquirer::from_config(config)?
        };
        Ok(Self { inner, runtime })
    }
}

impl<T: Transport, F: FallbackSource> BlockingAcquirer<T, F> {
    pub fn new(inner: RandomAcquirer<T, F>) -> EntropyResult<Self> {
        Ok(Self {
            inner,
            runtime: current_thread()?,
        })
    }

    /// Acquire `size` bytes, blocking the calling thread.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a tokio runtime; a runtime cannot be
    /// blocked on from one of its own worker threads.
    pub fn acquire(&self, size: usize) -> Acquisition {
        self.runtime.block_on(self.inner.acquire(size))
    }

    pub fn inner(&self) -> &RandomAcquirer<T, F> {
        &self.inner
    }
}

fn current_thread() -> std::io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}
