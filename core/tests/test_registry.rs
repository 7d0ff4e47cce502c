
#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use entrypack_core::compression::{
        CodecRegistry, CodecTuning, CoderProperty, CompressionError, CompressionMethod, Encoder,
    };
    use entrypack_core::progress::{NoProgress, Progress};
    use entrypack_core::types::PackError;

    /// Copies input and remembers every property set it was given.
    struct RecordingEncoder {
        seen: Arc<Mutex<Vec<CoderProperty>>>,
    }

    impl Encoder for RecordingEncoder {
        fn code(
            &mut self,
            input: &mut dyn Read,
            output: &mut dyn Write,
            _progress: &mut dyn Progress,
        ) -> Result<(), CompressionError> {
            std::io::copy(input, output)?;
            Ok(())
        }

        fn set_properties(&mut self, props: &[CoderProperty]) -> Result<(), CompressionError> {
            self.seen.lock().unwrap().extend_from_slice(props);
            Ok(())
        }
    }

    /// Encoder that keeps the default no-op `set_properties`.
    struct PlainEncoder;

    impl Encoder for PlainEncoder {
        fn code(
            &mut self,
            input: &mut dyn Read,
            output: &mut dyn Write,
            _progress: &mut dyn Progress,
        ) -> Result<(), CompressionError> {
            std::io::copy(input, output)?;
            Ok(())
        }
    }

    fn recording_registry(
        method: CompressionMethod,
    ) -> (CodecRegistry, Arc<AtomicUsize>, Arc<Mutex<Vec<CoderProperty>>>) {
        let builds = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = CodecRegistry::empty();
        let (b, s) = (builds.clone(), seen.clone());
        registry.register(method, move || {
            b.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(RecordingEncoder { seen: s.clone() }))
        });
        (registry, builds, seen)
    }

    #[test]
    fn builtin_availability() {
        let registry = CodecRegistry::with_builtin();
        assert!(registry.is_available(CompressionMethod::Store));
        assert!(registry.is_available(CompressionMethod::Deflate));
        assert!(registry.is_available(CompressionMethod::BZip2));
        assert!(!registry.is_available(CompressionMethod::Deflate64));
        assert!(!registry.is_constructed(CompressionMethod::Deflate));
    }

    #[test]
    fn unregistered_method_is_unavailable() {
        let mut registry = CodecRegistry::with_builtin();
        let err = registry
            .resolve(CompressionMethod::Deflate64, &CodecTuning::default())
            .err()
            .unwrap();
        assert!(matches!(err, CompressionError::UnsupportedMethod { method_id: 9 }));
        assert!(matches!(PackError::from(err), PackError::MethodUnavailable { method_id: 9 }));
    }

    #[test]
    fn unknown_raw_code_renders_as_hex() {
        let err = CompressionMethod::from_id(0x63).unwrap_err();
        assert!(err.to_string().contains("0x"), "{err}");
        assert_eq!(CompressionMethod::from_id(12).unwrap(), CompressionMethod::BZip2);
        assert_eq!(CompressionMethod::try_from(8u16).unwrap(), CompressionMethod::Deflate);
    }

    #[test]
    fn encoder_is_built_once() {
        let (mut registry, builds, _) = recording_registry(CompressionMethod::Deflate);
        let tuning = CodecTuning::default();
        for _ in 0..3 {
            registry.resolve(CompressionMethod::Deflate, &tuning).unwrap();
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(registry.is_constructed(CompressionMethod::Deflate));

        registry.clear_instances();
        registry.resolve(CompressionMethod::Deflate, &tuning).unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn register_drops_cached_instance() {
        let (mut registry, builds, _) = recording_registry(CompressionMethod::BZip2);
        registry.resolve(CompressionMethod::BZip2, &CodecTuning::default()).unwrap();
        registry.register(CompressionMethod::BZip2, || Ok(Box::new(PlainEncoder)));
        assert!(!registry.is_constructed(CompressionMethod::BZip2));
        registry.resolve(CompressionMethod::BZip2, &CodecTuning::default()).unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn deflate_family_gets_only_its_properties() {
        let (mut registry, _, seen) = recording_registry(CompressionMethod::Deflate);
        let tuning = CodecTuning {
            num_passes: Some(3),
            num_fast_bytes: Some(64),
            dictionary_size: Some(900_000),
            num_threads: Some(4),
            ..CodecTuning::default()
        };
        registry.resolve(CompressionMethod::Deflate, &tuning).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![CoderProperty::NumPasses(3), CoderProperty::NumFastBytes(64)]
        );
    }

    #[test]
    fn bzip2_family_gets_only_its_properties() {
        let (mut registry, _, seen) = recording_registry(CompressionMethod::BZip2);
        let tuning = CodecTuning {
            num_passes: Some(2),
            num_fast_bytes: Some(64),
            match_finder_cycles: Some(16),
            dictionary_size: Some(500_000),
            num_threads: Some(2),
        };
        registry.resolve(CompressionMethod::BZip2, &tuning).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                CoderProperty::DictionarySize(500_000),
                CoderProperty::NumPasses(2),
                CoderProperty::NumThreads(2),
            ]
        );
    }

    #[test]
    fn unset_tuning_skips_property_injection() {
        let (mut registry, _, seen) = recording_registry(CompressionMethod::Deflate);
        registry.resolve(CompressionMethod::Deflate, &CodecTuning::default()).unwrap();
        assert!(seen.lock().unwrap().is_empty());
        assert!(CodecTuning { num_passes: Some(4), ..Default::default() }
            .properties_for(CompressionMethod::Store)
            .is_empty());
    }

    #[test]
    fn encoder_without_property_support_is_fine() {
        let mut registry = CodecRegistry::empty();
        registry.register(CompressionMethod::Deflate, || Ok(Box::new(PlainEncoder)));
        let tuning = CodecTuning { num_passes: Some(7), ..Default::default() };
        let encoder = registry.resolve(CompressionMethod::Deflate, &tuning).unwrap();

        let mut out = Vec::new();
        encoder.code(&mut &b"abc"[..], &mut out, &mut NoProgress).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn out_of_range_tuning_fails_resolution() {
        let mut registry = CodecRegistry::with_builtin();
        let tuning = CodecTuning { num_fast_bytes: Some(2), ..Default::default() };
        let err = registry.resolve(CompressionMethod::Deflate, &tuning).err().unwrap();
        assert!(matches!(err, CompressionError::InvalidProperty { .. }));
        assert!(!registry.is_constructed(CompressionMethod::Deflate));
    }

    #[test]
    fn factory_failure_propagates() {
        let mut registry = CodecRegistry::empty();
        registry.register(CompressionMethod::Deflate64, || {
            Err(CompressionError::CodecInitFailed { codec: "deflate64".into(), msg: "no backend".into() })
        });
        let err = registry.resolve(CompressionMethod::Deflate64, &CodecTuning::default()).err().unwrap();
        assert!(matches!(PackError::from(err), PackError::Encoder { .. }));
    }
}
