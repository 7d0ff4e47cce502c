//! Raw deflate (no zlib wrapper, as stored in ZIP entries) via flate2.
//!
//! Design notes:
//! - flate2 exposes a single level knob, so pass count and fast-byte
//!   threshold are folded into a zlib level.
//! - Match-finder cycles are validated and kept but have no zlib equivalent.

use std::cell::Cell;
use std::io::{Read, Write};

use flate2::write::DeflateEncoder as RawDeflateWriter;
use flate2::Compression;

use crate::compression::codecs::pump;
use crate::compression::constants::{
    DEFLATE_MAX_FAST_BYTES, DEFLATE_MAX_PASSES, DEFLATE_MIN_FAST_BYTES, DEFLATE_MIN_PASSES,
};
use crate::compression::types::{CoderProperty, CompressionError, Encoder};
use crate::io::CountingWriter;
use crate::progress::Progress;

const CODEC: &str = "deflate";

#[derive(Debug, Default, Clone)]
pub struct DeflateEncoder {
    num_passes: Option<u32>,
    num_fast_bytes: Option<u32>,
    match_finder_cycles: Option<u32>,
}

impl DeflateEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_passes(&self) -> Option<u32> {
        self.num_passes
    }

    pub fn num_fast_bytes(&self) -> Option<u32> {
        self.num_fast_bytes
    }

    pub fn match_finder_cycles(&self) -> Option<u32> {
        self.match_finder_cycles
    }

    /// Effective zlib level for the current tuning.
    pub fn level(&self) -> u32 {
        let (passes, fast) = match (self.num_passes, self.num_fast_bytes) {
            (None, None) => return Compression::default().level(),
            (p, f) => (p.unwrap_or(1), f.unwrap_or(32)),
        };
        if passes >= 3 || fast >= 64 {
            9
        } else if passes == 2 || fast >= 48 {
            8
        } else if fast < 16 {
            3
        } else if fast < 32 {
            5
        } else {
            6
        }
    }
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> Result<u32, CompressionError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(CompressionError::InvalidProperty {
            codec: CODEC.into(),
            msg: format!("{name}={value} outside {min}..={max}"),
        })
    }
}

impl Encoder for DeflateEncoder {
    fn code(
        &mut self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        progress: &mut dyn Progress,
    ) -> Result<(), CompressionError> {
        let written = Cell::new(0);
        let counted = CountingWriter::new(output, &written);
        let mut enc = RawDeflateWriter::new(counted, Compression::new(self.level()));
        pump(input, &mut enc, &written, progress)?;
        let mut counted = enc.finish()?;
        counted.flush()?;
        Ok(())
    }

    fn set_properties(&mut self, props: &[CoderProperty]) -> Result<(), CompressionError> {
        for prop in props {
            match *prop {
                CoderProperty::NumPasses(v) => {
                    self.num_passes = Some(check_range("passes", v, DEFLATE_MIN_PASSES, DEFLATE_MAX_PASSES)?);
                }
                CoderProperty::NumFastBytes(v) => {
                    self.num_fast_bytes =
                        Some(check_range("fast bytes", v, DEFLATE_MIN_FAST_BYTES, DEFLATE_MAX_FAST_BYTES)?);
                }
                CoderProperty::MatchFinderCycles(v) => {
                    self.match_finder_cycles = Some(check_range("match finder cycles", v, 1, u32::MAX)?);
                }
                CoderProperty::DictionarySize(_) | CoderProperty::NumThreads(_) => {}
            }
        }
        Ok(())
    }
}
