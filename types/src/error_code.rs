use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-wide error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Generic
    Internal,
    InvalidArgument,
    InvalidConfig,

    // Remote service
    UpstreamUnavailable,
    UpstreamTimeout,
    UpstreamStatus,
    RetriesExhausted,
    BodyReadFailed,

    // Packet decoding
    MalformedResponse,
    RemoteRejected,
    ShapeMismatch,
    HexDecodeFailed,

    // Local generation
    FallbackFailed,
    DegradedEntropy,
}

impl ErrorCode {
    /// Returns a short string code suitable for API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ErrorCode::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            ErrorCode::UpstreamStatus => "UPSTREAM_STATUS",
            ErrorCode::RetriesExhausted => "RETRIES_EXHAUSTED",
            ErrorCode::BodyReadFailed => "BODY_READ_FAILED",
            ErrorCode::MalformedResponse => "MALFORMED_RESPONSE",
            ErrorCode::RemoteRejected => "REMOTE_REJECTED",
            ErrorCode::ShapeMismatch => "SHAPE_MISMATCH",
            ErrorCode::HexDecodeFailed => "HEX_DECODE_FAILED",
            ErrorCode::FallbackFailed => "FALLBACK_FAILED",
            ErrorCode::DegradedEntropy => "DEGRADED_ENTROPY",
        }
    }

    /// Whether the condition only downgrades an acquisition instead of failing it.
    pub fn is_absorbed(&self) -> bool {
        !matches!(
            self,
            ErrorCode::InvalidArgument
                | ErrorCode::InvalidConfig
                | ErrorCode::FallbackFailed
                | ErrorCode::Internal
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
