use http::Uri;
use qrand_transport::{HyperTransport, Transport};
use qrand_types::{ErrorCode, Quality};
use tracing::{debug, error, info, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::batch::RemotePacketBatch;
use crate::config::{AcquirerConfig, ConfigError};
use crate::error::{AcquireError, BatchError, EntropyResult, FallbackError};
use crate::fallback::{FallbackSource, OsFallback};

/// Outcome of one acquisition.
#[derive(Debug)]
#[must_use]
pub enum Acquisition {
    /// Exactly the requested number of bytes, all from the remote service.
    Success(Vec<u8>),
    /// Exactly the requested number of bytes, at least the tail from the fallback.
    Degraded(Degraded),
    /// No bytes.
    Failed(AcquireError),
}

/// Bytes of a degraded acquisition and why the remote path stopped.
#[derive(Debug)]
pub struct Degraded {
    pub bytes: Vec<u8>,
    /// Length of the leading run that came from the remote service.
    pub remote_len: usize,
    pub cause: BatchError,
}

impl Acquisition {
    /// `None` for a failed acquisition.
    pub fn quality(&self) -> Option<Quality> {
        match self {
            Acquisition::Success(_) => Some(Quality::True),
            Acquisition::Degraded(_) => Some(Quality::Degraded),
            Acquisition::Failed(_) => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Acquisition::Success(bytes) => Some(bytes),
            Acquisition::Degraded(d) => Some(&d.bytes),
            Acquisition::Failed(_) => None,
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Acquisition::Success(_) => None,
            Acquisition::Degraded(d) => Some(d.cause.error_code()),
            Acquisition::Failed(e) => Some(e.error_code()),
        }
    }

    /// Bytes together with their provenance.
    pub fn into_parts(self) -> EntropyResult<(Vec<u8>, Quality)> {
        match self {
            Acquisition::Success(bytes) => Ok((bytes, Quality::True)),
            Acquisition::Degraded(d) => Ok((d.bytes, Quality::Degraded)),
            Acquisition::Failed(e) => Err(e),
        }
    }

    /// Accept degraded bytes.
    pub fn into_bytes(self) -> EntropyResult<Vec<u8>> {
        self.into_parts().map(|(bytes, _)| bytes)
    }

    /// Only true-random bytes; degraded bytes are zeroized and reported as an error.
    pub fn into_strict(self) -> EntropyResult<Vec<u8>> {
        match self {
            Acquisition::Success(bytes) => Ok(bytes),
            Acquisition::Degraded(mut d) => {
                d.bytes.zeroize();
                Err(AcquireError::Degraded {
                    remote_len: d.remote_len,
                    cause: d.cause,
                })
            }
            Acquisition::Failed(e) => Err(e),
        }
    }
}

/// Fetches bytes from the remote service, falling back to a local generator.
pub struct RandomAcquirer<T = HyperTransport, F = OsFallback> {
    config: AcquirerConfig,
    uri: Uri,
    transport: T,
    fallback: F,
}

impl RandomAcquirer {
    /// Hyper transport and OS fallback.
    pub fn from_config(config: AcquirerConfig) -> EntropyResult<Self> {
        let transport = HyperTransport::new(config.request_timeout)?;
        Ok(Self::new(config, transport, OsFallback)?)
    }
}

impl<T: Transport, F: FallbackSource> RandomAcquirer<T, F> {
    pub fn new(config: AcquirerConfig, transport: T, fallback: F) -> Result<Self, ConfigError> {
        config.validate()?;
        let uri = config.request_uri()?;
        Ok(Self {
            config,
            uri,
            transport,
            fallback,
        })
    }

    pub fn config(&self) -> &AcquirerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Acquire exactly `size` bytes.
    ///
    /// Whole packets are fetched until enough bytes are collected or any step
    /// fails. After a failure the bytes already collected are kept and only
    /// the remainder comes from the fallback generator.
    pub async fn acquire(&self, size: usize) -> Acquisition {
        if size == 0 {
            warn!("rejecting acquisition of zero bytes");
            return Acquisition::Failed(AcquireError::InvalidSize(size));
        }

        let mut out = Vec::with_capacity(size);
        let mut batches = 0usize;
        let failure = loop {
            if out.len() >= size {
                break None;
            }
            match self.fetch_batch().await {
                Ok(batch) => {
                    batches += 1;
                    let take = (size - out.len()).min(batch.len());
                    out.extend_from_slice(&batch[..take]);
                    debug!(
                        batch = batches,
                        received = batch.len(),
                        kept = take,
                        total = out.len(),
                        "accepted entropy packet"
                    );
                }
                Err(cause) => break Some(cause),
            }
        };

        let Some(cause) = failure else {
            info!(size, batches, "acquired true-random bytes");
            return Acquisition::Success(out);
        };

        let remote_len = out.len();
        warn!(
            stage = cause.stage(),
            code = %cause.error_code(),
            error = %cause,
            remote_len,
            shortfall = size - remote_len,
            "falling back to pseudo-random generation"
        );

        out.resize(size, 0);
        if let Err(e) = self.fill_shortfall(&mut out[remote_len..]) {
            error!(error = %e, "fallback generator failed");
            out.zeroize();
            return Acquisition::Failed(e.into());
        }

        info!(size, remote_len, batches, "acquired degraded bytes");
        Acquisition::Degraded(Degraded {
            bytes: out,
            remote_len,
            cause,
        })
    }

    fn fill_shortfall(&self, dest: &mut [u8]) -> Result<(), FallbackError> {
        let requested = dest.len();
        let produced = self.fallback.fill(dest)?;
        if produced != requested {
            return Err(FallbackError::Short {
                requested,
                produced,
            });
        }
        Ok(())
    }

    /// One packet: GET (retried), then body, JSON and hex, each tried once.
    async fn fetch_batch(&self) -> Result<Zeroizing<Vec<u8>>, BatchError> {
        let response = self
            .config
            .retry
            .run(|| self.transport.get(&self.uri))
            .await?;
        let body = self
            .transport
            .read_body(response)
            .await
            .map_err(BatchError::Body)?;
        RemotePacketBatch::parse(&body)?.decode(&self.config.packet)
    }
}
