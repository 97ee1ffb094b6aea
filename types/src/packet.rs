use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest packet count the remote API accepts per request.
pub const MAX_PACKET_LENGTH: usize = 1024;

/// Largest item size, in bytes, the remote API accepts per request.
pub const MAX_ITEM_SIZE: usize = 1024;

/// Encoding of each item in a remote packet.
///
/// Only hex-encoded 16-bit blocks are decoded; the other encodings the
/// service offers return numbers instead of strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEncoding {
    #[default]
    #[serde(rename = "hex16")]
    Hex16,
}

impl ItemEncoding {
    /// Value of the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemEncoding::Hex16 => "hex16",
        }
    }
}

impl fmt::Display for ItemEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed shape of one remote request: `length` items of `size` bytes each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PacketShape {
    pub length: usize,
    pub size: usize,
    #[serde(default, rename = "type")]
    pub encoding: ItemEncoding,
}

impl Default for PacketShape {
    fn default() -> Self {
        Self {
            length: 10,
            size: 2,
            encoding: ItemEncoding::Hex16,
        }
    }
}

impl PacketShape {
    pub fn new(length: usize, size: usize) -> Self {
        Self {
            length,
            size,
            encoding: ItemEncoding::Hex16,
        }
    }

    /// Number of raw bytes a well-formed packet of this shape carries.
    pub fn bytes_per_packet(&self) -> usize {
        self.length * self.size
    }

    /// Whether both dimensions fall inside the limits of the remote API.
    pub fn is_within_limits(&self) -> bool {
        (1..=MAX_PACKET_LENGTH).contains(&self.length) && (1..=MAX_ITEM_SIZE).contains(&self.size)
    }

    /// Query string for the remote endpoint, without the leading `?`.
    pub fn query(&self) -> String {
        format!(
            "length={}&type={}&size={}",
            self.length, self.encoding, self.size
        )
    }
}

impl fmt::Display for PacketShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}B {}", self.length, self.size, self.encoding)
    }
}

/// Provenance of the bytes returned by an acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    /// Every byte came from the remote quantum source.
    True,
    /// Some or all bytes came from the local fallback generator.
    Degraded,
}

impl Quality {
    pub fn is_true_random(&self) -> bool {
        matches!(self, Quality::True)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::True => write!(f, "true-random"),
            Quality::Degraded => write!(f, "degraded"),
        }
    }
}
