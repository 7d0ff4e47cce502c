//! crypto/filter.rs
//! Cipher filter sitting between codec output and the entry sink.
//!
//! Design notes:
//! - One enum over the two cipher variants; the orchestrator keys it, writes
//!   the header, then hands the codec a `CipherWriter` instead of the sink.
//! - The filter is constructed once per compressor and re-keyed per trial.
//! - `write_footer` is a no-op (0 bytes) for the legacy cipher.

use std::cell::Cell;
use std::io::{self, Read, Write};

use crate::compression::codecs::pump;
use crate::compression::types::CompressionError;
use crate::crypto::types::{AesKeyStrength, CryptoError, EncryptionMode};
use crate::crypto::winzip_aes::WinZipAesEncoder;
use crate::crypto::zipcrypto::ZipCryptoEncoder;
use crate::io::CountingWriter;
use crate::progress::Progress;

#[derive(Debug)]
pub enum CipherFilter {
    ZipCrypto(ZipCryptoEncoder),
    WinZipAes(WinZipAesEncoder),
}

impl CipherFilter {
    pub fn new(mode: EncryptionMode, strength: AesKeyStrength) -> Self {
        match mode {
            EncryptionMode::ZipCrypto => CipherFilter::ZipCrypto(ZipCryptoEncoder::new()),
            EncryptionMode::WinZipAes => CipherFilter::WinZipAes(WinZipAesEncoder::new(strength)),
        }
    }

    pub fn mode(&self) -> EncryptionMode {
        match self {
            CipherFilter::ZipCrypto(_) => EncryptionMode::ZipCrypto,
            CipherFilter::WinZipAes(_) => EncryptionMode::WinZipAes,
        }
    }

    /// Legacy cipher keys off the plaintext CRC, so it needs a pre-pass.
    pub fn needs_plaintext_crc(&self) -> bool {
        matches!(self, CipherFilter::ZipCrypto(_))
    }

    pub fn set_password(&mut self, password: &[u8]) {
        match self {
            CipherFilter::ZipCrypto(c) => c.set_password(password),
            CipherFilter::WinZipAes(c) => c.set_password(password),
        }
    }

    /// Ignored by the AES variant.
    pub fn set_plaintext_crc(&mut self, crc: u32) {
        if let CipherFilter::ZipCrypto(c) = self {
            c.set_plaintext_crc(crc);
        }
    }

    /// Ignored by the legacy variant.
    pub fn set_key_strength(&mut self, strength: AesKeyStrength) {
        if let CipherFilter::WinZipAes(c) = self {
            c.set_key_strength(strength);
        }
    }

    pub fn header_len(&self) -> usize {
        match self {
            CipherFilter::ZipCrypto(c) => c.header_len(),
            CipherFilter::WinZipAes(c) => c.header_len(),
        }
    }

    pub fn footer_len(&self) -> usize {
        match self {
            CipherFilter::ZipCrypto(_) => 0,
            CipherFilter::WinZipAes(c) => c.footer_len(),
        }
    }

    pub fn write_header(&mut self, sink: &mut dyn Write) -> Result<usize, CryptoError> {
        match self {
            CipherFilter::ZipCrypto(c) => c.write_header(sink),
            CipherFilter::WinZipAes(c) => c.write_header(sink),
        }
    }

    pub fn write_footer(&mut self, sink: &mut dyn Write) -> Result<usize, CryptoError> {
        match self {
            CipherFilter::ZipCrypto(_) => Ok(0),
            CipherFilter::WinZipAes(c) => c.write_footer(sink),
        }
    }

    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        match self {
            CipherFilter::ZipCrypto(c) => c.encrypt_in_place(buf),
            CipherFilter::WinZipAes(c) => c.encrypt_in_place(buf),
        }
    }

    /// Wrap `sink` so that everything written through it is encrypted.
    pub fn writer<'a, W: Write + ?Sized>(&'a mut self, sink: &'a mut W) -> CipherWriter<'a, W> {
        CipherWriter { cipher: self, inner: sink, scratch: Vec::new() }
    }

    /// Pass-through filter: read plaintext from `input`, write ciphertext to
    /// `output`. The header must already be written.
    pub fn code(
        &mut self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        progress: &mut dyn Progress,
    ) -> Result<(), CompressionError> {
        let written = Cell::new(0u64);
        let mut encrypting = self.writer(output);
        let mut counted = CountingWriter::new(&mut encrypting, &written);
        pump(input, &mut counted, &written, progress)?;
        counted.flush()?;
        Ok(())
    }
}

fn crypto_to_io(err: CryptoError) -> io::Error {
    match err {
        CryptoError::Io(e) => e,
        other => io::Error::other(other),
    }
}

/// `Write` adapter that encrypts before forwarding to the wrapped sink.
pub struct CipherWriter<'a, W: Write + ?Sized> {
    cipher: &'a mut CipherFilter,
    inner: &'a mut W,
    scratch: Vec<u8>,
}

impl<W: Write + ?Sized> Write for CipherWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.scratch.clear();
        self.scratch.extend_from_slice(buf);
        self.cipher.encrypt_in_place(&mut self.scratch).map_err(crypto_to_io)?;
        // Keystream already advanced; a short write here would desync it.
        self.inner.write_all(&self.scratch)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_only_for_aes() {
        let zc = CipherFilter::new(EncryptionMode::ZipCrypto, AesKeyStrength::Aes256);
        let aes = CipherFilter::new(EncryptionMode::WinZipAes, AesKeyStrength::Aes128);
        assert_eq!(zc.footer_len(), 0);
        assert_eq!(aes.footer_len(), 10);
        assert_eq!(zc.header_len(), 12);
        assert_eq!(aes.header_len(), 10);
        assert!(zc.needs_plaintext_crc());
        assert!(!aes.needs_plaintext_crc());
    }

    #[test]
    fn writer_before_header_is_an_error() {
        let mut filter = CipherFilter::new(EncryptionMode::WinZipAes, AesKeyStrength::Aes256);
        filter.set_password(b"pw");
        let mut out = Vec::new();
        let mut w = filter.writer(&mut out);
        assert!(w.write_all(b"data").is_err());
    }
}
