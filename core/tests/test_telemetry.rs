
#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Write};
    use std::time::Duration;

    use entrypack_core::compression::{CodecRegistry, CompressionError, CompressionMethod, Encoder};
    use entrypack_core::io::InputSource;
    use entrypack_core::pipeline::{EntryCompressor, MethodConfiguration};
    use entrypack_core::progress::{NoProgress, Progress};
    use entrypack_core::telemetry::{Stage, StageTimes, TelemetrySnapshot, TelemetryTimer};

    struct Inflating;

    impl Encoder for Inflating {
        fn code(
            &mut self,
            input: &mut dyn Read,
            output: &mut dyn Write,
            _progress: &mut dyn Progress,
        ) -> Result<(), CompressionError> {
            let mut data = Vec::new();
            input.read_to_end(&mut data)?;
            output.write_all(&data)?;
            output.write_all(&data)?;
            Ok(())
        }
    }

    fn run(cfg: MethodConfiguration, registry: CodecRegistry, data: Vec<u8>) -> TelemetrySnapshot {
        let mut compressor = EntryCompressor::with_registry(cfg, registry).unwrap();
        assert!(compressor.last_telemetry().is_none());
        let mut sink = Cursor::new(Vec::new());
        compressor.compress(InputSource::Memory(data), &mut sink, &mut NoProgress).unwrap();
        compressor.last_telemetry().cloned().unwrap()
    }

    #[test]
    fn trial_log_records_every_attempt() {
        let mut registry = CodecRegistry::with_builtin();
        registry.register(CompressionMethod::Deflate, || Ok(Box::new(Inflating)));
        let snap = run(MethodConfiguration::default(), registry, vec![3u8; 1000]);

        assert_eq!(snap.trials, 2);
        assert_eq!(snap.trial_log.len(), 2);
        assert_eq!(snap.trial_log[0].method, CompressionMethod::Deflate);
        assert_eq!(snap.trial_log[0].packed_size, 2000);
        assert!(!snap.trial_log[0].accepted);

        let accepted = snap.accepted().unwrap();
        assert_eq!(accepted.method, CompressionMethod::Store);
        assert_eq!(snap.bytes_plaintext, 2000);
        assert_eq!(snap.bytes_packed, 3000);
        assert_eq!(snap.bytes_overhead, 0);
        assert!((snap.compression_ratio - 1.0).abs() < f64::EPSILON);
        assert!(snap.sanity_check());
    }

    #[test]
    fn legacy_cipher_records_prepass_and_headers() {
        let cfg = MethodConfiguration::single(CompressionMethod::Deflate).with_password("pw");
        let data: Vec<u8> = b"abcd".iter().copied().cycle().take(40_000).collect();
        let snap = run(cfg, CodecRegistry::with_builtin(), data);

        assert_eq!(snap.trials, 1);
        assert_eq!(snap.bytes_prepass, 40_000);
        assert_eq!(snap.bytes_overhead, 12);
        assert!(snap.stage_times.contains(Stage::Prepass));
        assert!(snap.stage_times.contains(Stage::Encode));
        assert!(snap.stage_times.contains(Stage::Finalize));
        assert!(snap.compression_ratio < 1.0);
        assert!(snap.sanity_check());
    }

    #[test]
    fn unencrypted_call_has_no_prepass() {
        let snap = run(MethodConfiguration::default(), CodecRegistry::with_builtin(), vec![0u8; 5000]);
        assert!(!snap.stage_times.contains(Stage::Prepass));
        assert_eq!(snap.bytes_prepass, 0);
    }

    #[test]
    fn snapshot_serializes() {
        let snap = run(MethodConfiguration::default(), CodecRegistry::with_builtin(), vec![1u8; 64]);
        let json = serde_json::to_string(&snap).unwrap();
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trial_log, snap.trial_log);
        assert_eq!(back.trials, snap.trials);
    }

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add(Stage::Encode, Duration::from_micros(300));
        times.add(Stage::Encode, Duration::from_micros(200));
        times.add(Stage::Finalize, Duration::from_micros(50));
        assert_eq!(times.get(Stage::Encode), Duration::from_micros(500));
        assert_eq!(times.get(Stage::Prepass), Duration::ZERO);
        assert_eq!(times.total(), Duration::from_micros(550));
        assert_eq!(Stage::Prepass.to_string(), "prepass");
    }

    #[test]
    fn timer_charges_failed_stages_too() {
        let mut timer = TelemetryTimer::new();
        let out: Result<(), &str> = timer.time(Stage::Encode, || {
            std::thread::sleep(Duration::from_millis(2));
            Err("boom")
        });
        assert!(out.is_err());
        assert!(timer.stage_times.contains(Stage::Encode));
        assert!(timer.stage_times.get(Stage::Encode) >= Duration::from_millis(2));
        assert_eq!(timer.time(Stage::Finalize, || 7), 7);
    }
}
