//! telemetry/mod.rs
//! Per-call telemetry for the entry compressor: counters, stage timers and
//! an immutable snapshot.
//!
//! Notes:
//! - Counters and timers are reset at the start of every `compress` call.
//! - The snapshot is plain data and serializes with serde.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
