//! io/mod.rs
//! Stream plumbing around the pipeline: CRC accumulators, input
//! classification, and the output sink contract.

pub mod crc;
pub mod sink;
pub mod source;

pub use crc::{CrcState, SeekableCrcReader, SequentialCrcReader};
pub use sink::{CountingWriter, EntrySink};
pub use source::{open_input, CrcInput, InputSource, ReadSeek};
