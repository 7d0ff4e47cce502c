//! compression/codecs/mod.rs
//! Built-in encoders: store (verbatim copy), raw deflate, bzip2.
//!
//! All of them drive the same chunked loop (`pump`), so progress and
//! cancellation behave identically whichever codec is selected.

pub mod bzip2;
pub mod deflate;
pub mod store;

pub use self::bzip2::Bzip2Encoder;
pub use self::deflate::DeflateEncoder;
pub use self::store::StoreEncoder;

use std::cell::Cell;
use std::io::{self, Read, Write};

use crate::compression::types::CompressionError;
use crate::constants::CODER_BUFFER_SIZE;
use crate::progress::Progress;

/// Copy `input` to EOF into `sink`, reporting after every chunk.
/// `written` is the coded-byte counter of the final sink.
/// Returns the number of input bytes consumed.
pub(crate) fn pump(
    input: &mut dyn Read,
    sink: &mut dyn Write,
    written: &Cell<u64>,
    progress: &mut dyn Progress,
) -> Result<u64, CompressionError> {
    let mut buf = vec![0u8; CODER_BUFFER_SIZE];
    let mut total_in = 0u64;
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        sink.write_all(&buf[..n])?;
        total_in += n as u64;
        progress.report(total_in, written.get())?;
    }
    Ok(total_in)
}
