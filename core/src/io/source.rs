//! io/source.rs
//! Input classification: seekable vs sequential-only.
//!
//! Rust has no runtime interface probing, so the caller states the capability
//! through the `InputSource` variant. `open_input` picks the matching CRC
//! accumulator once per `compress` call.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::path::PathBuf;

use crate::io::crc::{SeekableCrcReader, SequentialCrcReader};
use crate::types::PackError;
use crate::utils::compute_stream_crc;

/// Object-safe `Read + Seek`.
pub trait ReadSeek: Read + Seek + Send {}
impl<T: Read + Seek + Send> ReadSeek for T {}

/// Canonical input abstraction
pub enum InputSource {
    /// Forward-only stream (pipe, socket, stdin).
    Reader(Box<dyn Read + Send>),
    /// Random-access stream.
    Seekable(Box<dyn ReadSeek>),
    File(PathBuf),
    Memory(Vec<u8>),
}

impl InputSource {
    pub fn reader<R: Read + Send + 'static>(r: R) -> Self {
        InputSource::Reader(Box::new(r))
    }

    pub fn seekable<R: Read + Seek + Send + 'static>(r: R) -> Self {
        InputSource::Seekable(Box::new(r))
    }

    pub fn is_seekable(&self) -> bool {
        !matches!(self, InputSource::Reader(_))
    }
}

impl std::fmt::Debug for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Reader(_) => f.write_str("InputSource::Reader"),
            InputSource::Seekable(_) => f.write_str("InputSource::Seekable"),
            InputSource::File(p) => write!(f, "InputSource::File({})", p.display()),
            InputSource::Memory(b) => write!(f, "InputSource::Memory({} bytes)", b.len()),
        }
    }
}

/// Input wrapped in the CRC accumulator matching its capability.
pub enum CrcInput {
    Seekable(SeekableCrcReader<Box<dyn ReadSeek>>),
    Sequential(SequentialCrcReader<Box<dyn Read + Send>>),
}

impl std::fmt::Debug for CrcInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_seekable() { "Seekable" } else { "Sequential" };
        f.debug_struct("CrcInput")
            .field("kind", &kind)
            .field("size", &self.size())
            .finish()
    }
}

/// Classify and wrap the caller's input.
pub fn open_input(src: InputSource) -> Result<CrcInput, PackError> {
    let input = match src {
        InputSource::Reader(r) => CrcInput::Sequential(SequentialCrcReader::new(r)),
        InputSource::Seekable(r) => CrcInput::Seekable(SeekableCrcReader::new(r)),
        InputSource::File(p) => {
            let file: Box<dyn ReadSeek> = Box::new(File::open(p)?);
            CrcInput::Seekable(SeekableCrcReader::new(file))
        }
        InputSource::Memory(b) => {
            let cursor: Box<dyn ReadSeek> = Box::new(Cursor::new(b));
            CrcInput::Seekable(SeekableCrcReader::new(cursor))
        }
    };
    Ok(input)
}

impl CrcInput {
    pub fn is_seekable(&self) -> bool {
        matches!(self, CrcInput::Seekable(_))
    }

    /// Rewind to offset 0 and reset counters.
    /// A sequential source cannot rewind; it is accepted only while nothing
    /// has been read yet.
    pub fn rewind(&mut self) -> io::Result<()> {
        match self {
            CrcInput::Seekable(r) => r.rewind(),
            CrcInput::Sequential(r) if r.size() == 0 => Ok(()),
            CrcInput::Sequential(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "sequential input cannot be rewound",
            )),
        }
    }

    /// Full read of the raw source, bypassing the accumulator, then rewind.
    /// Returns the plaintext CRC-32 and length.
    pub fn prepass_crc(&mut self) -> io::Result<(u32, u64)> {
        match self {
            CrcInput::Seekable(r) => {
                let crc = compute_stream_crc(r.get_mut())?;
                let len = r.get_mut().stream_position()?;
                r.rewind()?;
                Ok((crc, len))
            }
            CrcInput::Sequential(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "sequential input cannot be pre-read",
            )),
        }
    }

    pub fn crc(&self) -> u32 {
        match self {
            CrcInput::Seekable(r) => r.crc(),
            CrcInput::Sequential(r) => r.crc(),
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            CrcInput::Seekable(r) => r.size(),
            CrcInput::Sequential(r) => r.size(),
        }
    }
}

impl Read for CrcInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            CrcInput::Seekable(r) => r.read(buf),
            CrcInput::Sequential(r) => r.read(buf),
        }
    }
}
