//! io/crc.rs
//! Streaming CRC accumulators.
//!
//! Design notes:
//! - Every read is forwarded to the wrapped source and the bytes returned are
//!   folded into a running CRC-32 and byte count before the caller sees them.
//! - `crc()`/`size()` describe everything read since the last reset; they are
//!   only meaningful once the source has been drained.
//! - Two wrappers share `CrcState`: one for forward-only sources, one for
//!   sources that can rewind to offset 0.

use std::io::{self, Read, Seek, SeekFrom};

#[derive(Clone, Debug, Default)]
pub struct CrcState {
    hasher: crc32fast::Hasher,
    size: u64,
}

impl CrcState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.size += data.len() as u64;
    }

    /// CRC-32 of all bytes seen since the last reset.
    pub fn crc(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn reset(&mut self) {
        self.hasher.reset();
        self.size = 0;
    }
}

/// CRC accumulator over a forward-only source.
#[derive(Debug)]
pub struct SequentialCrcReader<R> {
    inner: R,
    state: CrcState,
}

impl<R: Read> SequentialCrcReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, state: CrcState::new() }
    }

    pub fn crc(&self) -> u32 {
        self.state.crc()
    }

    pub fn size(&self) -> u64 {
        self.state.size()
    }

    /// Reset counters only; the source position is untouched.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for SequentialCrcReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.state.update(&buf[..n]);
        Ok(n)
    }
}

/// CRC accumulator over a source that supports absolute seeking.
#[derive(Debug)]
pub struct SeekableCrcReader<R> {
    inner: R,
    state: CrcState,
}

impl<R: Read + Seek> SeekableCrcReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, state: CrcState::new() }
    }

    pub fn crc(&self) -> u32 {
        self.state.crc()
    }

    pub fn size(&self) -> u64 {
        self.state.size()
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Seek the source back to offset 0 and reset the counters.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.state.reset();
        Ok(())
    }

    /// Raw access to the wrapped source. Reads through it bypass the counters.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> Read for SeekableCrcReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.state.update(&buf[..n]);
        Ok(n)
    }
}
