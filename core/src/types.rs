use std::io;

use thiserror::Error;

use crate::compression::{CompressionError, CompressionMethod};
use crate::crypto::CryptoError;
use crate::progress::Cancelled;
use crate::utils::enum_name_or_hex;

/// Unified pipeline error.
/// - Every collaborator error converts into this via `From`, so `?` threads
///   through each step of `EntryCompressor::compress`.
/// - The first error aborts the call; nothing is retried or skipped.
#[derive(Debug, Error)]
pub enum PackError {
    /// Configured method has no resolvable encoder.
    #[error("compression method unavailable: {}", enum_name_or_hex::<CompressionMethod>(*method_id))]
    MethodUnavailable { method_id: u16 },

    /// Configuration and source capabilities do not fit together.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Progress callback asked to stop.
    #[error("operation cancelled")]
    Cancelled,

    /// Read, write, seek or truncate on a stream collaborator failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Codec reported an internal failure.
    #[error("encoder {codec} failed: {msg}")]
    Encoder { codec: String, msg: String },

    /// Cipher filter could not be initialised or driven.
    #[error("crypto error: {0}")]
    Crypto(CryptoError),

    /// Malformed or empty configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = PackError> = std::result::Result<T, E>;

impl From<CompressionError> for PackError {
    fn from(e: CompressionError) -> Self {
        match e {
            CompressionError::UnsupportedMethod { method_id } => PackError::MethodUnavailable { method_id },
            CompressionError::Cancelled => PackError::Cancelled,
            CompressionError::Io(err) => PackError::Io(err),
            CompressionError::InvalidProperty { codec, msg }
            | CompressionError::CodecInitFailed { codec, msg }
            | CompressionError::CodecProcessFailed { codec, msg } => PackError::Encoder { codec, msg },
        }
    }
}

impl From<CryptoError> for PackError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Io(err) => PackError::Io(err),
            other => PackError::Crypto(other),
        }
    }
}

impl From<Cancelled> for PackError {
    fn from(_: Cancelled) -> Self {
        PackError::Cancelled
    }
}

impl From<serde_json::Error> for PackError {
    fn from(e: serde_json::Error) -> Self {
        PackError::InvalidConfig(e.to_string())
    }
}
