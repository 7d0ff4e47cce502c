//! pipeline/outcome.rs
//! Metadata of one compressed entry, as consumed by the archive writer.

use serde::{Deserialize, Serialize};

use crate::compression::CompressionMethod;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionOutcome {
    /// Method of the accepted trial.
    pub method: CompressionMethod,
    /// Minimum version needed to extract (version x 10).
    pub extract_version: u8,
    /// CRC-32 of the plaintext.
    pub crc: u32,
    pub unpacked_size: u64,
    /// Bytes in the sink, cipher framing included.
    pub packed_size: u64,
}

impl CompressionOutcome {
    pub fn method_id(&self) -> u16 {
        self.method.id()
    }
}
