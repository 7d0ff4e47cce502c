//! compression/types.rs
//! Method registry enum, codec errors, and the uniform encoder contract.
use std::fmt;
use std::io::{self, Read, Write};

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression::constants::{extract_versions, method_ids};
use crate::progress::{Cancelled, Progress};
use crate::utils::enum_name_or_hex;

/// ZIP compression methods the pipeline can try.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    Store     = method_ids::STORE,
    Deflate   = method_ids::DEFLATE,
    Deflate64 = method_ids::DEFLATE64,
    BZip2     = method_ids::BZIP2,
}

impl CompressionMethod {
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Resolve a raw method code; unknown codes are unavailable methods.
    pub fn from_id(raw: u16) -> Result<Self, CompressionError> {
        Self::try_from_primitive(raw).map_err(|_| CompressionError::UnsupportedMethod { method_id: raw })
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressionMethod::Store     => "store",
            CompressionMethod::Deflate   => "deflate",
            CompressionMethod::Deflate64 => "deflate64",
            CompressionMethod::BZip2     => "bzip2",
        }
    }

    /// Minimum decoder version a reader needs for entries using this method.
    pub fn extract_version(self) -> u8 {
        match self {
            CompressionMethod::Store     => extract_versions::STORE,
            CompressionMethod::Deflate   => extract_versions::DEFLATE,
            CompressionMethod::Deflate64 => extract_versions::DEFLATE64,
            CompressionMethod::BZip2     => extract_versions::BZIP2,
        }
    }

    pub fn is_store(self) -> bool {
        self == CompressionMethod::Store
    }

    pub fn is_deflate_family(self) -> bool {
        matches!(self, CompressionMethod::Deflate | CompressionMethod::Deflate64)
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codec tuning knobs. Each encoder applies the ones it understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoderProperty {
    NumPasses(u32),
    NumFastBytes(u32),
    MatchFinderCycles(u32),
    DictionarySize(u32),
    NumThreads(u32),
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("unsupported compression method: {}", enum_name_or_hex::<CompressionMethod>(*method_id))]
    UnsupportedMethod { method_id: u16 },

    #[error("codec {codec} rejected property: {msg}")]
    InvalidProperty { codec: String, msg: String },

    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: String, msg: String },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: String, msg: String },

    #[error("cancelled by progress callback")]
    Cancelled,

    #[error("codec I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<Cancelled> for CompressionError {
    fn from(_: Cancelled) -> Self {
        CompressionError::Cancelled
    }
}

/// Uniform encoder contract.
///
/// `code` consumes `input` to EOF and writes a self-delimited representation
/// to `output`; its length is whatever the receiving sink ends up holding.
// Require Send so pipeline instances can move across threads.
pub trait Encoder: Send {
    fn code(
        &mut self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        progress: &mut dyn Progress,
    ) -> Result<(), CompressionError>;

    /// Best-effort tuning hook. Encoders without tunables keep the default
    /// no-op; unknown properties are ignored by implementors.
    fn set_properties(&mut self, _props: &[CoderProperty]) -> Result<(), CompressionError> {
        Ok(())
    }
}
