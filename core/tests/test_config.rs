
#[cfg(test)]
mod tests {
    use entrypack_core::compression::{CodecTuning, CompressionMethod};
    use entrypack_core::crypto::{AesKeyStrength, EncryptionMode};
    use entrypack_core::pipeline::{EntryCompressor, MethodConfiguration};
    use entrypack_core::types::PackError;

    #[test]
    fn defaults_end_with_store() {
        let cfg = MethodConfiguration::default();
        assert_eq!(cfg.methods, vec![CompressionMethod::Deflate, CompressionMethod::Store]);
        assert!(cfg.password.is_none());
        assert_eq!(cfg.encryption, EncryptionMode::ZipCrypto);
        assert_eq!(cfg.aes_strength, AesKeyStrength::Aes256);
        assert_eq!(cfg.tuning, CodecTuning::default());
        assert!(!cfg.needs_crc_prepass());
    }

    #[test]
    fn json_fills_missing_fields() {
        let cfg = MethodConfiguration::from_json(
            r#"{ "methods": ["bzip2", "store"], "encryption": "aes", "tuning": { "dictionary_size": 300000 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.methods, vec![CompressionMethod::BZip2, CompressionMethod::Store]);
        assert_eq!(cfg.encryption, EncryptionMode::WinZipAes);
        assert_eq!(cfg.aes_strength, AesKeyStrength::Aes256);
        assert_eq!(cfg.tuning.dictionary_size, Some(300_000));
        assert_eq!(cfg.tuning.num_passes, None);
    }

    #[test]
    fn password_is_read_but_never_written() {
        let cfg = MethodConfiguration::from_json(r#"{ "password": "s3cret", "aes_strength": "aes128" }"#).unwrap();
        assert_eq!(cfg.password.as_deref(), Some("s3cret"));
        assert_eq!(cfg.aes_strength, AesKeyStrength::Aes128);
        assert!(cfg.needs_crc_prepass());

        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(!json.contains("password"));

        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("s3cret"));
        assert!(dbg.contains("redacted"));
    }

    #[test]
    fn empty_method_list_is_rejected() {
        let err = MethodConfiguration::from_json(r#"{ "methods": [] }"#).unwrap_err();
        assert!(matches!(err, PackError::InvalidConfig(_)));

        let cfg = MethodConfiguration::default().with_methods(Vec::<CompressionMethod>::new());
        assert!(matches!(EntryCompressor::new(cfg), Err(PackError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_or_unknown_values_are_config_errors() {
        assert!(matches!(MethodConfiguration::from_json("{ nope"), Err(PackError::InvalidConfig(_))));
        assert!(matches!(
            MethodConfiguration::from_json(r#"{ "methods": ["lzma"] }"#),
            Err(PackError::InvalidConfig(_))
        ));
    }

    #[test]
    fn builders_compose() {
        let cfg = MethodConfiguration::single(CompressionMethod::Deflate)
            .with_password("pw")
            .with_encryption(EncryptionMode::WinZipAes)
            .with_aes_strength(AesKeyStrength::Aes192)
            .with_tuning(CodecTuning { num_passes: Some(2), ..Default::default() });
        assert_eq!(cfg.methods, vec![CompressionMethod::Deflate]);
        assert!(cfg.is_encrypted());
        assert!(!cfg.needs_crc_prepass());
        assert_eq!(cfg.tuning.num_passes, Some(2));
        assert!(cfg.validate().is_ok());
    }
}
