//! telemetry/snapshot.rs
//! Immutable view of one `compress` call.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::{TelemetryCounters, TrialSummary};
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub trials: u64,
    pub bytes_plaintext: u64,
    pub bytes_packed: u64,
    pub bytes_overhead: u64,
    pub bytes_prepass: u64,
    /// Packed / unpacked of the accepted trial; 0.0 for empty input.
    pub compression_ratio: f64,
    pub throughput_plaintext_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    pub trial_log: Vec<TrialSummary>,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let compression_ratio = match counters.accepted() {
            Some(t) if t.unpacked_size > 0 => t.packed_size as f64 / t.unpacked_size as f64,
            _ => 0.0,
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_plaintext as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            trials: counters.trials,
            bytes_plaintext: counters.bytes_plaintext,
            bytes_packed: counters.bytes_packed,
            bytes_overhead: counters.bytes_overhead,
            bytes_prepass: counters.bytes_prepass,
            compression_ratio,
            throughput_plaintext_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
            trial_log: counters.trial_log.clone(),
        }
    }

    pub fn accepted(&self) -> Option<&TrialSummary> {
        self.trial_log.iter().rev().find(|t| t.accepted)
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    /// Stage times never exceed wall time and exactly one trial is accepted.
    pub fn sanity_check(&self) -> bool {
        self.total_stage_time() <= self.elapsed
            && self.trial_log.iter().filter(|t| t.accepted).count() == 1
            && self.trials as usize == self.trial_log.len()
    }
}
