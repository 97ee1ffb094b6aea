use qrand_transport::TransportError;
use qrand_types::{ErrorCode, PacketShape};
use thiserror::Error;

use crate::config::ConfigError;
use crate::retry::RetryError;

/// Why a remote batch could not be used. Always absorbed into a degraded
/// result, never returned as a hard failure.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("GET request failed: {0}")]
    Fetch(#[from] RetryError<TransportError>),

    #[error("reading response failed: {0}")]
    Body(#[source] TransportError),

    #[error("response is not packet JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("remote service reported success=false")]
    Rejected,

    #[error("response declares {length} items of {size}B with {items} present, requested {expected}")]
    ShapeMismatch {
        expected: PacketShape,
        length: usize,
        size: usize,
        items: usize,
    },

    #[error("item {index} has {hex_len} hex digits, expected {expected}")]
    ItemSize {
        index: usize,
        hex_len: usize,
        expected: usize,
    },

    #[error("item {index} is not valid hex: {source}")]
    Hex {
        index: usize,
        #[source]
        source: hex::FromHexError,
    },
}

impl BatchError {
    /// Pipeline step that failed, for diagnostics.
    pub fn stage(&self) -> &'static str {
        match self {
            BatchError::Fetch(_) => "fetch",
            BatchError::Body(_) => "body",
            BatchError::Json(_) => "json",
            BatchError::Rejected => "success-flag",
            BatchError::ShapeMismatch { .. } => "shape",
            BatchError::ItemSize { .. } | BatchError::Hex { .. } => "hex",
        }
    }

    /// Map to a platform error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            BatchError::Fetch(_) => ErrorCode::RetriesExhausted,
            BatchError::Body(_) => ErrorCode::BodyReadFailed,
            BatchError::Json(_) => ErrorCode::MalformedResponse,
            BatchError::Rejected => ErrorCode::RemoteRejected,
            BatchError::ShapeMismatch { .. } => ErrorCode::ShapeMismatch,
            BatchError::ItemSize { .. } | BatchError::Hex { .. } => ErrorCode::HexDecodeFailed,
        }
    }
}

/// Failure of the local fallback generator.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("os entropy source failed: {0}")]
    Os(getrandom::Error),

    #[error("rng failed: {0}")]
    Rng(String),

    #[error("generator produced {produced} of {requested} bytes")]
    Short { requested: usize, produced: usize },
}

/// Errors surfaced to callers of an acquisition.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("size must be a positive integer, got {0}")]
    InvalidSize(usize),

    #[error("fallback generator failed: {0}")]
    Fallback(#[from] FallbackError),

    /// Only produced when a caller asks for strictly true-random output.
    #[error("remote entropy unavailable after {remote_len} bytes, pseudo-random bytes substituted: {cause}")]
    Degraded {
        remote_len: usize,
        #[source]
        cause: BatchError,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),

    #[error("runtime setup failed: {0}")]
    Runtime(#[from] std::io::Error),
}

impl AcquireError {
    /// Map to a platform error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AcquireError::InvalidSize(_) => ErrorCode::InvalidArgument,
            AcquireError::Fallback(_) => ErrorCode::FallbackFailed,
            AcquireError::Degraded { .. } => ErrorCode::DegradedEntropy,
            AcquireError::Config(_) => ErrorCode::InvalidConfig,
            AcquireError::Transport(e) => e.error_code(),
            AcquireError::Runtime(_) => ErrorCode::Internal,
        }
    }
}

pub type EntropyResult<T> = Result<T, AcquireError>;
