//! entrypack-core
//!
//! Per-entry compression pipeline for ZIP-style archive writers: tries the
//! configured methods in order, optionally encrypts, and keeps the first
//! result that shrinks the entry.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod progress;

// Stream collaborators
pub mod io;
pub mod compression;
pub mod crypto;

pub mod telemetry;

// Orchestration
pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{CodecRegistry, CodecTuning, CompressionMethod, Encoder};
    pub use crate::crypto::{AesKeyStrength, EncryptionMode};
    pub use crate::io::{EntrySink, InputSource};
    pub use crate::pipeline::{CompressionOutcome, EntryCompressor, MethodConfiguration};
    pub use crate::progress::{Cancelled, NoProgress, Progress};
    pub use crate::types::{PackError, Result};
}
