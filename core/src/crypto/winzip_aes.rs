//! crypto/winzip_aes.rs
//! WinZip AES (AE-2 framing) encrypt side.
//!
//! Design:
//! - PBKDF2-HMAC-SHA1(password, salt, 1000) -> enc key | mac key | 2-byte verifier.
//! - AES-CTR with a 128-bit little-endian counter starting at 1.
//! - HMAC-SHA1 over the ciphertext, truncated to 10 bytes, as footer.
//!
//! Header = salt || verifier. Salt length depends on key strength only, so
//! the header size is known before any data is produced.
//!
//! Security notes:
//! - A fresh random salt is drawn for every header; re-keying for a new
//!   trial never reuses a keystream.

use std::io::Write;

use aes::{Aes128, Aes192, Aes256};
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use tracing::trace;
use zeroize::Zeroizing;

use crate::constants::{AES_AUTH_CODE_LEN, AES_BLOCK_LEN, AES_PASSWORD_VERIFIER_LEN, AES_PBKDF2_ROUNDS};
use crate::crypto::types::{AesKeyStrength, CryptoError};

type HmacSha1 = Hmac<Sha1>;

/// Key material derived from password and salt.
pub struct DerivedAesKeys {
    pub encryption_key: Zeroizing<Vec<u8>>,
    pub mac_key: Zeroizing<Vec<u8>>,
    pub verifier: [u8; AES_PASSWORD_VERIFIER_LEN],
}

/// PBKDF2-HMAC-SHA1 key schedule of the WinZip AES format.
pub fn derive_keys(password: &[u8], salt: &[u8], strength: AesKeyStrength) -> DerivedAesKeys {
    let key_len = strength.key_len();
    let mut derived = Zeroizing::new(vec![0u8; 2 * key_len + AES_PASSWORD_VERIFIER_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha1>(password, salt, AES_PBKDF2_ROUNDS, &mut derived);

    let mut verifier = [0u8; AES_PASSWORD_VERIFIER_LEN];
    verifier.copy_from_slice(&derived[2 * key_len..]);
    DerivedAesKeys {
        encryption_key: Zeroizing::new(derived[..key_len].to_vec()),
        mac_key: Zeroizing::new(derived[key_len..2 * key_len].to_vec()),
        verifier,
    }
}

/// Counter block for the first AES-CTR block.
pub fn initial_counter() -> [u8; AES_BLOCK_LEN] {
    let mut iv = [0u8; AES_BLOCK_LEN];
    iv[0] = 1;
    iv
}

/// AES-CTR keystream for the three supported key sizes.
pub enum AesCtr {
    Aes128(ctr::Ctr128LE<Aes128>),
    Aes192(ctr::Ctr128LE<Aes192>),
    Aes256(ctr::Ctr128LE<Aes256>),
}

impl AesCtr {
    pub fn new(strength: AesKeyStrength, key: &[u8]) -> Result<Self, CryptoError> {
        let iv = initial_counter();
        let bad_len = |_| CryptoError::KeyDerivation(format!("AES key length {} invalid", key.len()));
        let ctr = match strength {
            AesKeyStrength::Aes128 => Self::Aes128(ctr::Ctr128LE::new_from_slices(key, &iv).map_err(bad_len)?),
            AesKeyStrength::Aes192 => Self::Aes192(ctr::Ctr128LE::new_from_slices(key, &iv).map_err(bad_len)?),
            AesKeyStrength::Aes256 => Self::Aes256(ctr::Ctr128LE::new_from_slices(key, &iv).map_err(bad_len)?),
        };
        Ok(ctr)
    }

    /// XOR the keystream into `buf`; encryption and decryption are the same.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) {
        match self {
            AesCtr::Aes128(c) => c.apply_keystream(buf),
            AesCtr::Aes192(c) => c.apply_keystream(buf),
            AesCtr::Aes256(c) => c.apply_keystream(buf),
        }
    }
}

struct AesState {
    ctr: AesCtr,
    mac: HmacSha1,
}

/// Block-cipher mode filter: password + key strength -> header, keystream,
/// authentication footer.
pub struct WinZipAesEncoder {
    password: Option<Zeroizing<Vec<u8>>>,
    strength: AesKeyStrength,
    state: Option<AesState>,
}

impl Default for WinZipAesEncoder {
    fn default() -> Self {
        Self::new(AesKeyStrength::default())
    }
}

impl WinZipAesEncoder {
    pub fn new(strength: AesKeyStrength) -> Self {
        Self { password: None, strength, state: None }
    }

    pub fn set_password(&mut self, password: &[u8]) {
        self.password = Some(Zeroizing::new(password.to_vec()));
        self.state = None;
    }

    pub fn set_key_strength(&mut self, strength: AesKeyStrength) {
        self.strength = strength;
        self.state = None;
    }

    pub fn key_strength(&self) -> AesKeyStrength {
        self.strength
    }

    pub fn header_len(&self) -> usize {
        self.strength.header_len()
    }

    pub fn footer_len(&self) -> usize {
        AES_AUTH_CODE_LEN
    }

    /// Draw a salt, derive keys, and emit salt || verifier.
    pub fn write_header(&mut self, sink: &mut dyn Write) -> Result<usize, CryptoError> {
        let password = self.password.as_ref().ok_or(CryptoError::MissingPassword)?;

        let mut salt = vec![0u8; self.strength.salt_len()];
        rand::thread_rng().fill_bytes(&mut salt);
        let keys = derive_keys(password, &salt, self.strength);

        let ctr = AesCtr::new(self.strength, &keys.encryption_key)?;
        let mac = HmacSha1::new_from_slice(&keys.mac_key)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

        sink.write_all(&salt)?;
        sink.write_all(&keys.verifier)?;
        self.state = Some(AesState { ctr, mac });

        let header_len = self.header_len();
        trace!(strength = ?self.strength, header_len, "winzip aes header written");
        Ok(header_len)
    }

    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let state = self.state.as_mut().ok_or(CryptoError::NotInitialized("aes header not written"))?;
        state.ctr.apply_keystream(buf);
        state.mac.update(buf);
        Ok(())
    }

    /// Emit the truncated HMAC over everything encrypted since the header.
    /// The cipher must be re-keyed with `write_header` before further use.
    pub fn write_footer(&mut self, sink: &mut dyn Write) -> Result<usize, CryptoError> {
        let state = self.state.take().ok_or(CryptoError::NotInitialized("aes header not written"))?;
        let tag = state.mac.finalize().into_bytes();
        sink.write_all(&tag[..AES_AUTH_CODE_LEN])?;
        trace!(footer_len = AES_AUTH_CODE_LEN, "winzip aes footer written");
        Ok(AES_AUTH_CODE_LEN)
    }
}

impl std::fmt::Debug for WinZipAesEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WinZipAesEncoder")
            .field("password_set", &self.password.is_some())
            .field("strength", &self.strength)
            .field("keyed", &self.state.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_sizes_follow_strength() {
        assert_eq!(WinZipAesEncoder::new(AesKeyStrength::Aes128).header_len(), 10);
        assert_eq!(WinZipAesEncoder::new(AesKeyStrength::Aes192).header_len(), 14);
        assert_eq!(WinZipAesEncoder::new(AesKeyStrength::Aes256).header_len(), 18);
    }

    #[test]
    fn footer_without_header_fails() {
        let mut enc = WinZipAesEncoder::default();
        enc.set_password(b"pw");
        let mut out = Vec::new();
        assert!(matches!(enc.write_footer(&mut out), Err(CryptoError::NotInitialized(_))));
    }

    #[test]
    fn derivation_is_deterministic_per_salt() {
        let a = derive_keys(b"pw", &[7u8; 16], AesKeyStrength::Aes256);
        let b = derive_keys(b"pw", &[7u8; 16], AesKeyStrength::Aes256);
        let c = derive_keys(b"pw", &[8u8; 16], AesKeyStrength::Aes256);
        assert_eq!(*a.encryption_key, *b.encryption_key);
        assert_eq!(a.verifier, b.verifier);
        assert_ne!(*a.encryption_key, *c.encryption_key);
        assert_eq!(a.encryption_key.len(), 32);
        assert_eq!(a.mac_key.len(), 32);
    }
}
