//! pipeline/compress.rs
//! Trial-and-select compression of one archive entry.
//!
//! Design notes:
//! - Methods are tried in configured order; the first trial whose output is
//!   smaller than the plaintext (plus cipher header, when encrypting) wins and
//!   the remaining candidates are skipped.
//! - If no trial meets that bar, the last attempted trial stands.
//! - Only a seekable input can be re-read, so an unseekable one gets exactly
//!   one trial. The legacy cipher needs a CRC pre-pass and therefore a
//!   seekable input in every case. An encrypted entry with more than one
//!   candidate is refused for unseekable input rather than trimmed.
//! - Every trial rewinds the input and overwrites the sink from offset 0; the
//!   sink is truncated to the accepted size at the end.
//! - Errors are fail-fast: the first one aborts the call unchanged.

use std::io::{SeekFrom, Write};

use tracing::{debug, trace, warn};

use crate::compression::{CodecRegistry, CompressionMethod};
use crate::crypto::CipherFilter;
use crate::io::{open_input, CrcInput, EntrySink, InputSource};
use crate::pipeline::config::MethodConfiguration;
use crate::pipeline::outcome::CompressionOutcome;
use crate::progress::Progress;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer, TrialSummary};
use crate::types::PackError;

/// Sizes and checksum measured at the end of one trial.
#[derive(Clone, Copy, Debug)]
struct Trial {
    method: CompressionMethod,
    crc: u32,
    unpacked_size: u64,
    packed_size: u64,
}

/// Compresses entries with a fixed configuration.
///
/// Encoders and the cipher filter are built on first use and reused across
/// trials and calls. Instances share nothing, so separate entries can be
/// compressed concurrently with separate compressors.
#[derive(Debug)]
pub struct EntryCompressor {
    config: MethodConfiguration,
    codecs: CodecRegistry,
    cipher: Option<CipherFilter>,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
    last_telemetry: Option<TelemetrySnapshot>,
}

impl EntryCompressor {
    /// Compressor with the built-in codecs.
    pub fn new(config: MethodConfiguration) -> Result<Self, PackError> {
        Self::with_registry(config, CodecRegistry::with_builtin())
    }

    pub fn with_registry(config: MethodConfiguration, codecs: CodecRegistry) -> Result<Self, PackError> {
        config.validate()?;
        Ok(Self {
            config,
            codecs,
            cipher: None,
            counters: TelemetryCounters::default(),
            timer: TelemetryTimer::new(),
            last_telemetry: None,
        })
    }

    pub fn config(&self) -> &MethodConfiguration {
        &self.config
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Register or replace encoders before compressing.
    pub fn registry_mut(&mut self) -> &mut CodecRegistry {
        &mut self.codecs
    }

    /// Telemetry of the last successful `compress` call.
    pub fn last_telemetry(&self) -> Option<&TelemetrySnapshot> {
        self.last_telemetry.as_ref()
    }

    /// Number of trials allowed for this input, or `NotSupported`.
    fn trial_count(&self, seekable: bool) -> Result<usize, PackError> {
        let configured = self.config.methods.len();
        if !seekable && self.config.needs_crc_prepass() {
            return Err(PackError::NotSupported(
                "legacy cipher requires a seekable input for its CRC pre-pass".into(),
            ));
        }
        if !seekable && configured > 1 && self.config.is_encrypted() {
            return Err(PackError::NotSupported(
                "encrypted entry with several candidate methods requires a seekable input".into(),
            ));
        }
        if seekable || configured == 1 {
            Ok(configured)
        } else {
            Ok(1)
        }
    }

    /// Key the cipher for a new trial and write its header.
    /// Returns the header length, 0 when not encrypting.
    fn start_cipher<S: EntrySink>(&mut self, input: &mut CrcInput, output: &mut S) -> Result<usize, PackError> {
        let Some(password) = self.config.password.as_deref() else {
            return Ok(0);
        };
        let (mode, strength) = (self.config.encryption, self.config.aes_strength);
        let cipher = self.cipher.get_or_insert_with(|| CipherFilter::new(mode, strength));
        cipher.set_password(password.as_bytes());

        if cipher.needs_plaintext_crc() {
            let (crc, len) = self.timer.time(Stage::Prepass, || input.prepass_crc())?;
            self.counters.add_prepass(len);
            trace!(crc, len, "crc pre-pass done");
            cipher.set_plaintext_crc(crc);
        }

        let header_len = cipher.write_header(&mut *output)?;
        self.counters.add_overhead(header_len);
        Ok(header_len)
    }

    /// Run one trial: rewind, frame, encode. The sink is left positioned at
    /// the end of the trial's output.
    fn run_trial<S: EntrySink>(
        &mut self,
        method: CompressionMethod,
        input: &mut CrcInput,
        output: &mut S,
        progress: &mut dyn Progress,
    ) -> Result<(Trial, usize), PackError> {
        input.rewind()?;
        output.seek(SeekFrom::Start(0))?;

        let header_len = self.start_cipher(input, output)?;
        let encrypted = self.config.is_encrypted();

        let encoder = self.codecs.resolve(method, &self.config.tuning)?;
        let cipher = self.cipher.as_mut().filter(|_| encrypted);
        self.timer.time(Stage::Encode, || -> Result<(), PackError> {
            match cipher {
                Some(cipher) => {
                    let mut sink = cipher.writer(&mut *output);
                    encoder.code(&mut *input, &mut sink, progress)?;
                    sink.flush()?;
                }
                None => encoder.code(&mut *input, &mut *output, progress)?,
            }
            Ok(())
        })?;

        let trial = Trial {
            method,
            crc: input.crc(),
            unpacked_size: input.size(),
            packed_size: output.stream_position()?,
        };
        Ok((trial, header_len))
    }

    /// Compress `input` into `output` and report what was chosen.
    ///
    /// `output` is rewound before every trial and truncated to the accepted
    /// size before returning. On error its content is unspecified.
    pub fn compress<S: EntrySink>(
        &mut self,
        input: InputSource,
        output: &mut S,
        progress: &mut dyn Progress,
    ) -> Result<CompressionOutcome, PackError> {
        self.counters.reset();
        self.timer = TelemetryTimer::new();
        self.last_telemetry = None;

        let mut input = open_input(input)?;
        let seekable = input.is_seekable();
        let trial_count = self.trial_count(seekable)?;
        let methods: Vec<CompressionMethod> = self.config.methods[..trial_count].to_vec();
        debug!(
            seekable,
            configured = self.config.methods.len(),
            trials = trial_count,
            encrypted = self.config.is_encrypted(),
            "compressing entry"
        );

        let mut chosen: Option<Trial> = None;
        let mut shrunk = false;
        for (index, &method) in methods.iter().enumerate() {
            debug!(index, method = %method, "trial start");
            let (trial, header_len) = self.run_trial(method, &mut input, output, progress)?;

            // Header bytes are already inside packed_size; allow for them once.
            let bar = trial.unpacked_size + header_len as u64;
            shrunk = trial.packed_size < bar;
            trace!(
                method = %method,
                unpacked = trial.unpacked_size,
                packed = trial.packed_size,
                bar,
                shrunk,
                "trial finished"
            );
            self.counters.add_trial(TrialSummary {
                method,
                unpacked_size: trial.unpacked_size,
                packed_size: trial.packed_size,
                accepted: shrunk,
            });
            chosen = Some(trial);
            if shrunk {
                break;
            }
        }

        let trial = chosen.ok_or_else(|| PackError::InvalidConfig("no compression methods configured".into()))?;
        if !shrunk {
            warn!(method = %trial.method, "no candidate shrank the entry, keeping last trial");
            if let Some(last) = self.counters.trial_log.last_mut() {
                last.accepted = true;
            }
        }

        let encrypted = self.config.is_encrypted();
        let (cipher, counters) = (&mut self.cipher, &mut self.counters);
        let packed_size = self.timer.time(Stage::Finalize, || -> Result<u64, PackError> {
            let mut packed_size = trial.packed_size;
            if let Some(cipher) = cipher.as_mut().filter(|_| encrypted) {
                let footer_len = cipher.write_footer(&mut *output)?;
                if footer_len > 0 {
                    packed_size = output.stream_position()?;
                    counters.add_footer(footer_len);
                }
            }
            output.flush()?;
            output.set_len(packed_size)?;
            Ok(packed_size)
        })?;

        self.timer.finish();
        self.last_telemetry = Some(TelemetrySnapshot::from(&self.counters, &self.timer));

        let outcome = CompressionOutcome {
            method: trial.method,
            extract_version: trial.method.extract_version(),
            crc: trial.crc,
            unpacked_size: trial.unpacked_size,
            packed_size,
        };
        debug!(
            method = %outcome.method,
            crc = outcome.crc,
            unpacked = outcome.unpacked_size,
            packed = outcome.packed_size,
            "entry compressed"
        );
        Ok(outcome)
    }
}
