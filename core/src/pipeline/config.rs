//! pipeline/config.rs
//! Caller-supplied method configuration, fixed for the compressor's lifetime.

use serde::{Deserialize, Serialize};

use crate::compression::{CodecTuning, CompressionMethod};
use crate::crypto::{AesKeyStrength, EncryptionMode};
use crate::types::PackError;

/// Ordered candidate methods, optional password and codec tuning.
///
/// Methods are tried in order; the first one that shrinks the entry wins.
/// With a password set every trial is encrypted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodConfiguration {
    pub methods: Vec<CompressionMethod>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub encryption: EncryptionMode,
    pub aes_strength: AesKeyStrength,
    pub tuning: CodecTuning,
}

impl Default for MethodConfiguration {
    fn default() -> Self {
        Self {
            methods: vec![CompressionMethod::Deflate, CompressionMethod::Store],
            password: None,
            encryption: EncryptionMode::default(),
            aes_strength: AesKeyStrength::default(),
            tuning: CodecTuning::default(),
        }
    }
}

impl std::fmt::Debug for MethodConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodConfiguration")
            .field("methods", &self.methods)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("encryption", &self.encryption)
            .field("aes_strength", &self.aes_strength)
            .field("tuning", &self.tuning)
            .finish()
    }
}

impl MethodConfiguration {
    /// Single-method configuration.
    pub fn single(method: CompressionMethod) -> Self {
        Self { methods: vec![method], ..Self::default() }
    }

    pub fn with_methods(mut self, methods: impl Into<Vec<CompressionMethod>>) -> Self {
        self.methods = methods.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_encryption(mut self, mode: EncryptionMode) -> Self {
        self.encryption = mode;
        self
    }

    pub fn with_aes_strength(mut self, strength: AesKeyStrength) -> Self {
        self.aes_strength = strength;
        self
    }

    pub fn with_tuning(mut self, tuning: CodecTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn is_encrypted(&self) -> bool {
        self.password.is_some()
    }

    /// Password set and the legacy cipher selected.
    pub fn needs_crc_prepass(&self) -> bool {
        self.is_encrypted() && self.encryption == EncryptionMode::ZipCrypto
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, PackError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), PackError> {
        if self.methods.is_empty() {
            return Err(PackError::InvalidConfig("no compression methods configured".into()));
        }
        Ok(())
    }
}
