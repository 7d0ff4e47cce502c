//! crypto/zipcrypto.rs
//! Traditional PKWARE ("ZipCrypto") stream cipher, encrypt side.
//!
//! Design notes:
//! - Three 32-bit keys seeded from the password; each plaintext byte updates
//!   them after being encrypted.
//! - The 12-byte header is random except for its last two bytes, which carry
//!   the high bytes of the plaintext CRC-32. Readers use them as a password
//!   check, so the CRC has to be known before the first byte is encrypted.
//!
//! Security notes:
//! - This cipher is broken (known-plaintext attacks). It exists for archive
//!   compatibility only.

use std::io::Write;

use rand::RngCore;
use tracing::trace;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::constants::ZIPCRYPTO_HEADER_LEN;
use crate::crypto::types::CryptoError;

const KEY0_INIT: u32 = 0x1234_5678;
const KEY1_INIT: u32 = 0x2345_6789;
const KEY2_INIT: u32 = 0x3456_7890;
const KEY1_MULTIPLIER: u32 = 134_775_813;

/// Reflected CRC-32 table (polynomial 0xEDB88320). The key schedule needs the
/// raw single-byte step without pre/post inversion, which `crc32fast` does not
/// expose.
const CRC_TABLE: [u32; 256] = build_crc_table();

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut c = i as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { 0xEDB8_8320 ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[i] = c;
        i += 1;
    }
    table
}

#[inline]
fn crc32_step(crc: u32, byte: u8) -> u32 {
    CRC_TABLE[((crc ^ byte as u32) & 0xff) as usize] ^ (crc >> 8)
}

/// Key state of the PKWARE cipher.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ZipCryptoKeys {
    k0: u32,
    k1: u32,
    k2: u32,
}

impl ZipCryptoKeys {
    pub fn new(password: &[u8]) -> Self {
        let mut keys = Self { k0: KEY0_INIT, k1: KEY1_INIT, k2: KEY2_INIT };
        for &b in password {
            keys.update(b);
        }
        keys
    }

    #[inline]
    fn update(&mut self, plain: u8) {
        self.k0 = crc32_step(self.k0, plain);
        self.k1 = self
            .k1
            .wrapping_add(self.k0 & 0xff)
            .wrapping_mul(KEY1_MULTIPLIER)
            .wrapping_add(1);
        self.k2 = crc32_step(self.k2, (self.k1 >> 24) as u8);
    }

    #[inline]
    fn stream_byte(&self) -> u8 {
        let t = (self.k2 | 2) & 0xffff;
        ((t.wrapping_mul(t ^ 1)) >> 8) as u8
    }

    pub fn encrypt(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            let plain = *b;
            *b = plain ^ self.stream_byte();
            self.update(plain);
        }
    }

    pub fn decrypt(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            let plain = *b ^ self.stream_byte();
            self.update(plain);
            *b = plain;
        }
    }
}

impl std::fmt::Debug for ZipCryptoKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ZipCryptoKeys(..)")
    }
}

/// Legacy cipher filter: password + plaintext CRC -> header, then keystream.
#[derive(Default)]
pub struct ZipCryptoEncoder {
    password: Option<Zeroizing<Vec<u8>>>,
    crc: Option<u32>,
    keys: Option<ZipCryptoKeys>,
}

impl ZipCryptoEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Setting a password discards any keystream from a previous header.
    pub fn set_password(&mut self, password: &[u8]) {
        self.password = Some(Zeroizing::new(password.to_vec()));
        self.keys = None;
    }

    pub fn set_plaintext_crc(&mut self, crc: u32) {
        self.crc = Some(crc);
        self.keys = None;
    }

    pub fn header_len(&self) -> usize {
        ZIPCRYPTO_HEADER_LEN
    }

    /// Key the cipher and emit the encrypted 12-byte header.
    pub fn write_header(&mut self, sink: &mut dyn Write) -> Result<usize, CryptoError> {
        let password = self.password.as_ref().ok_or(CryptoError::MissingPassword)?;
        let crc = self.crc.ok_or(CryptoError::MissingCrc)?;

        let mut header = [0u8; ZIPCRYPTO_HEADER_LEN];
        rand::thread_rng().fill_bytes(&mut header[..ZIPCRYPTO_HEADER_LEN - 2]);
        header[ZIPCRYPTO_HEADER_LEN - 2] = (crc >> 16) as u8;
        header[ZIPCRYPTO_HEADER_LEN - 1] = (crc >> 24) as u8;

        let mut keys = ZipCryptoKeys::new(password);
        keys.encrypt(&mut header);
        sink.write_all(&header)?;
        self.keys = Some(keys);

        trace!(header_len = ZIPCRYPTO_HEADER_LEN, "zipcrypto header written");
        Ok(ZIPCRYPTO_HEADER_LEN)
    }

    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let keys = self.keys.as_mut().ok_or(CryptoError::NotInitialized("zipcrypto header not written"))?;
        keys.encrypt(buf);
        Ok(())
    }
}

impl std::fmt::Debug for ZipCryptoEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipCryptoEncoder")
            .field("password_set", &self.password.is_some())
            .field("crc", &self.crc)
            .field("keyed", &self.keys.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc_table_matches_crc32fast() {
        // Full CRC-32 = inverted raw steps.
        let data = b"123456789";
        let mut crc = 0xffff_ffffu32;
        for &b in data {
            crc = crc32_step(crc, b);
        }
        assert_eq!(!crc, crate::utils::compute_crc32(data));
    }

    #[test]
    fn keystream_roundtrip() {
        let mut enc = ZipCryptoKeys::new(b"secret");
        let mut dec = ZipCryptoKeys::new(b"secret");
        let mut buf = b"attack at dawn".to_vec();
        enc.encrypt(&mut buf);
        assert_ne!(&buf, b"attack at dawn");
        dec.decrypt(&mut buf);
        assert_eq!(&buf, b"attack at dawn");
    }

    #[test]
    fn header_requires_crc() {
        let mut enc = ZipCryptoEncoder::new();
        enc.set_password(b"pw");
        let mut out = Vec::new();
        assert!(matches!(enc.write_header(&mut out), Err(CryptoError::MissingCrc)));
        assert!(out.is_empty());
    }
}
