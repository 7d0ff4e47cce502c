// ## 📂 File: `src/crypto/types.rs`

use std::io;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::AES_PASSWORD_VERIFIER_LEN;

/// Which cipher wraps codec output when a password is configured.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncryptionMode {
    /// Traditional PKWARE keystream cipher; needs the plaintext CRC up front.
    #[default]
    #[serde(rename = "zipcrypto")]
    ZipCrypto,
    /// WinZip AES (CTR + HMAC-SHA1); independent of the plaintext.
    #[serde(rename = "aes")]
    WinZipAes,
}

/// WinZip AES key strength (values as stored in the AE-x extra field).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AesKeyStrength {
    Aes128 = 0x01,
    Aes192 = 0x02,
    #[default]
    Aes256 = 0x03,
}

impl AesKeyStrength {
    pub fn key_len(self) -> usize {
        match self {
            AesKeyStrength::Aes128 => 16,
            AesKeyStrength::Aes192 => 24,
            AesKeyStrength::Aes256 => 32,
        }
    }

    pub fn salt_len(self) -> usize {
        self.key_len() / 2
    }

    /// Salt plus password verifier.
    pub fn header_len(self) -> usize {
        self.salt_len() + AES_PASSWORD_VERIFIER_LEN
    }
}

#[derive(Debug, Error)]
pub enum CryptoError {
    /// `write_header` called before `set_password`.
    #[error("cipher password not set")]
    MissingPassword,

    /// Legacy cipher header requires the plaintext CRC.
    #[error("plaintext CRC not set for legacy cipher")]
    MissingCrc,

    /// Encrypting or finishing before the header was written.
    #[error("cipher not initialised: {0}")]
    NotInitialized(&'static str),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("cipher I/O error: {0}")]
    Io(#[from] io::Error),
}
