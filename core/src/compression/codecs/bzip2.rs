//! BZip2 encoder via the `bzip2` crate.
//!
//! Dictionary size maps onto the block size (1..=9 units of 100 000 bytes).
//! Pass and thread counts are kept for callers that inspect them; libbzip2
//! itself is single-pass and single-threaded.

use std::cell::Cell;
use std::io::{Read, Write};

use ::bzip2::write::BzEncoder;
use ::bzip2::Compression;

use crate::compression::codecs::pump;
use crate::compression::constants::{BZIP2_BLOCK_UNIT, BZIP2_MAX_LEVEL};
use crate::compression::types::{CoderProperty, CompressionError, Encoder};
use crate::io::CountingWriter;
use crate::progress::Progress;

const CODEC: &str = "bzip2";

#[derive(Debug, Default, Clone)]
pub struct Bzip2Encoder {
    dictionary_size: Option<u32>,
    num_passes: Option<u32>,
    num_threads: Option<u32>,
}

impl Bzip2Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block size level, 1..=9.
    pub fn level(&self) -> u32 {
        match self.dictionary_size {
            None => BZIP2_MAX_LEVEL,
            Some(size) => size.div_ceil(BZIP2_BLOCK_UNIT).clamp(1, BZIP2_MAX_LEVEL),
        }
    }

    pub fn num_passes(&self) -> Option<u32> {
        self.num_passes
    }

    pub fn num_threads(&self) -> Option<u32> {
        self.num_threads
    }
}

impl Encoder for Bzip2Encoder {
    fn code(
        &mut self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        progress: &mut dyn Progress,
    ) -> Result<(), CompressionError> {
        let written = Cell::new(0);
        let counted = CountingWriter::new(output, &written);
        let mut enc = BzEncoder::new(counted, Compression::new(self.level()));
        pump(input, &mut enc, &written, progress)?;
        let mut counted = enc.finish().map_err(|e| CompressionError::CodecProcessFailed {
            codec: CODEC.into(),
            msg: e.to_string(),
        })?;
        counted.flush()?;
        Ok(())
    }

    fn set_properties(&mut self, props: &[CoderProperty]) -> Result<(), CompressionError> {
        for prop in props {
            match *prop {
                CoderProperty::DictionarySize(v) => self.dictionary_size = Some(v),
                CoderProperty::NumPasses(0) | CoderProperty::NumThreads(0) => {
                    return Err(CompressionError::InvalidProperty {
                        codec: CODEC.into(),
                        msg: format!("{:?} must be non-zero", prop),
                    });
                }
                CoderProperty::NumPasses(v) => self.num_passes = Some(v),
                CoderProperty::NumThreads(v) => self.num_threads = Some(v),
                CoderProperty::NumFastBytes(_) | CoderProperty::MatchFinderCycles(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_size_selects_block_level() {
        let mut enc = Bzip2Encoder::new();
        assert_eq!(enc.level(), 9);
        enc.set_properties(&[CoderProperty::DictionarySize(250_000)]).unwrap();
        assert_eq!(enc.level(), 3);
        enc.set_properties(&[CoderProperty::DictionarySize(10)]).unwrap();
        assert_eq!(enc.level(), 1);
        enc.set_properties(&[CoderProperty::DictionarySize(u32::MAX)]).unwrap();
        assert_eq!(enc.level(), 9);
    }

    #[test]
    fn zero_threads_is_rejected() {
        let mut enc = Bzip2Encoder::new();
        assert!(enc.set_properties(&[CoderProperty::NumThreads(0)]).is_err());
        enc.set_properties(&[CoderProperty::NumThreads(4), CoderProperty::NumPasses(2)]).unwrap();
        assert_eq!(enc.num_threads(), Some(4));
        assert_eq!(enc.num_passes(), Some(2));
    }
}
