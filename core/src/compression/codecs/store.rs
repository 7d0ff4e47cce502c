//! codecs/store.rs
//! Pass-through codec.

use std::cell::Cell;
use std::io::{Read, Write};

use crate::compression::codecs::pump;
use crate::compression::types::{CompressionError, Encoder};
use crate::io::CountingWriter;
use crate::progress::Progress;

#[derive(Debug, Default)]
pub struct StoreEncoder;

impl StoreEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for StoreEncoder {
    fn code(
        &mut self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        progress: &mut dyn Progress,
    ) -> Result<(), CompressionError> {
        let written = Cell::new(0);
        let mut sink = CountingWriter::new(output, &written);
        pump(input, &mut sink, &written, progress)?;
        sink.flush()?;
        Ok(())
    }
}
