//! Parsing and validation of one remote response.
//!
//! A batch is all-or-nothing: any bad item discards every byte decoded so far,
//! and the discarded bytes are zeroized.

use qrand_types::PacketShape;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::BatchError;

/// JSON body returned by the remote service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct RemotePacketBatch {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub length: usize,
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub data: Vec<String>,
    pub success: bool,
}

impl RemotePacketBatch {
    pub fn parse(body: &[u8]) -> Result<Self, BatchError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Decode every item into raw bytes, in order.
    ///
    /// The declared shape must match `requested`, which also guarantees the
    /// batch is never empty.
    pub fn decode(&self, requested: &PacketShape) -> Result<Zeroizing<Vec<u8>>, BatchError> {
        if !self.success {
            return Err(BatchError::Rejected);
        }

        if self.length == 0
            || self.size == 0
            || self.length != requested.length
            || self.size != requested.size
            || self.data.len() != self.length
        {
            return Err(BatchError::ShapeMismatch {
                expected: *requested,
                length: self.length,
                size: self.size,
                items: self.data.len(),
            });
        }

        let mut out = Zeroizing::new(vec![0u8; self.length * self.size]);
        for (index, (item, slot)) in self
            .data
            .iter()
            .zip(out.chunks_exact_mut(self.size))
            .enumerate()
        {
            if item.len() != self.size * 2 {
                return Err(BatchError::ItemSize {
                    index,
                    hex_len: item.len(),
                    expected: self.size * 2,
                });
            }
            hex::decode_to_slice(item, slot).map_err(|source| BatchError::Hex { index, source })?;
        }

        Ok(out)
    }
}
