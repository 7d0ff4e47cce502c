//! progress.rs
//! Cooperative progress reporting and cancellation.
//!
//! Design notes:
//! - Coders call `report` after every chunk with cumulative byte counts.
//! - Returning `Err(Cancelled)` aborts the current trial; the orchestrator
//!   propagates it unchanged.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cancelled by progress callback")]
pub struct Cancelled;

pub trait Progress {
    /// `in_total`: plaintext bytes consumed, `out_total`: coded bytes produced
    /// so far in the current trial.
    fn report(&mut self, in_total: u64, out_total: u64) -> Result<(), Cancelled>;
}

/// Progress sink that never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _in_total: u64, _out_total: u64) -> Result<(), Cancelled> {
        Ok(())
    }
}

impl<F> Progress for F
where
    F: FnMut(u64, u64) -> Result<(), Cancelled>,
{
    fn report(&mut self, in_total: u64, out_total: u64) -> Result<(), Cancelled> {
        self(in_total, out_total)
    }
}
