//! compression/mod.rs
//! Codec layer of the entry pipeline.
//!
//! Design notes:
//! - Every encoder exposes the same `code(input, output, progress)` contract,
//!   so the orchestrator never branches per codec.
//! - Registry resolves method IDs to memoized, tuned encoder instances.

pub mod codecs;
pub mod constants;
pub mod registry;
pub mod types;

pub use constants::*;
pub use registry::*;
pub use types::*;
