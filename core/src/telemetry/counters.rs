//! telemetry/counters.rs
//! Mutable counters filled in while trials run.
//!
//! Summary: one `TrialSummary` per attempted method plus running byte totals.
//! Converted into an immutable `TelemetrySnapshot` when the call ends.

use serde::{Deserialize, Serialize};

use crate::compression::types::CompressionMethod;

/// Result of a single trial, accepted or not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub method: CompressionMethod,
    pub unpacked_size: u64,
    pub packed_size: u64,
    pub accepted: bool,
}

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub trials: u64,
    /// Plaintext bytes read across all trials, pre-pass excluded.
    pub bytes_plaintext: u64,
    /// Bytes written to the sink across all trials, framing included.
    pub bytes_packed: u64,
    /// Cipher header and footer bytes across all trials.
    pub bytes_overhead: u64,
    /// Plaintext bytes read by the legacy-cipher CRC pre-pass.
    pub bytes_prepass: u64,
    pub trial_log: Vec<TrialSummary>,
}

impl TelemetryCounters {
    /// Record the cipher header or footer as overhead.
    pub fn add_overhead(&mut self, len: usize) {
        self.bytes_overhead += len as u64;
    }

    pub fn add_prepass(&mut self, len: u64) {
        self.bytes_prepass += len;
    }

    pub fn add_trial(&mut self, summary: TrialSummary) {
        self.trials += 1;
        self.bytes_plaintext += summary.unpacked_size;
        self.bytes_packed += summary.packed_size;
        self.trial_log.push(summary);
    }

    /// Footer bytes land after the accepted trial was logged.
    pub fn add_footer(&mut self, len: usize) {
        self.bytes_overhead += len as u64;
        self.bytes_packed += len as u64;
        if let Some(last) = self.trial_log.last_mut() {
            last.packed_size += len as u64;
        }
    }

    pub fn accepted(&self) -> Option<&TrialSummary> {
        self.trial_log.iter().rev().find(|t| t.accepted)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
