/// Traditional PKWARE encryption header length.
pub const ZIPCRYPTO_HEADER_LEN: usize = 12;

/// WinZip AES password verification value length.
pub const AES_PASSWORD_VERIFIER_LEN: usize = 2;

/// WinZip AES authentication code (truncated HMAC-SHA1) length.
pub const AES_AUTH_CODE_LEN: usize = 10;

/// PBKDF2 iteration count fixed by the WinZip AES format.
pub const AES_PBKDF2_ROUNDS: u32 = 1000;

/// AES block size in bytes.
pub const AES_BLOCK_LEN: usize = 16;

/// Read/write chunk for coders and the CRC pre-pass (64 KiB).
pub const CODER_BUFFER_SIZE: usize = 64 * 1024;
