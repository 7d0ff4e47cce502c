//! io/sink.rs
//! Output sink contract and a byte-counting writer for coders.

use std::cell::Cell;
use std::fs::File;
use std::io::{self, Cursor, Seek, Write};

/// Output target of one entry: rewound before every trial and truncated to
/// the accepted size at the end.
pub trait EntrySink: Write + Seek {
    fn set_len(&mut self, size: u64) -> io::Result<()>;
}

impl EntrySink for File {
    fn set_len(&mut self, size: u64) -> io::Result<()> {
        File::set_len(self, size)
    }
}

impl EntrySink for Cursor<Vec<u8>> {
    fn set_len(&mut self, size: u64) -> io::Result<()> {
        let size = usize::try_from(size)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "size exceeds address space"))?;
        self.get_mut().resize(size, 0);
        Ok(())
    }
}

impl<S: EntrySink + ?Sized> EntrySink for &mut S {
    fn set_len(&mut self, size: u64) -> io::Result<()> {
        (**self).set_len(size)
    }
}

impl<S: EntrySink + ?Sized> EntrySink for Box<S> {
    fn set_len(&mut self, size: u64) -> io::Result<()> {
        (**self).set_len(size)
    }
}

/// Forwards writes and adds the accepted byte count to a shared cell, so the
/// count stays readable while an encoder holds the writer.
pub struct CountingWriter<'c, W> {
    inner: W,
    written: &'c Cell<u64>,
}

impl<'c, W: Write> CountingWriter<'c, W> {
    pub fn new(inner: W, written: &'c Cell<u64>) -> Self {
        Self { inner, written }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written.set(self.written.get() + n as u64);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
