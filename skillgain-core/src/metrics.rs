//! Runtime counters and span names for the progression path.
//!
//! Lock-free `AtomicU64` counters bumped once per gain call; read on demand
//! through [`ProgressionCounters::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::engine::{GainOutcome, Verdict};

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Atomic counters, one per [`Verdict`] class plus a total.
#[derive(Debug)]
pub struct ProgressionCounters {
    /// Gain calls resolved.
    pub attempts: AtomicU64,
    /// Calls whose delta was applied.
    pub applied: AtomicU64,
    /// Calls salvaged from a failure.
    pub partial_on_fail: AtomicU64,
    /// Calls rejected by the chance gate.
    pub gate_rejected: AtomicU64,
    /// Calls with no headroom under the cap.
    pub at_cap: AtomicU64,
    /// Calls whose factors multiplied out to nothing.
    pub no_delta: AtomicU64,
    /// Failed actions with nothing salvaged.
    pub failed: AtomicU64,
    /// Calls refused by a family hard gate.
    pub disqualified: AtomicU64,
}

impl ProgressionCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attempts: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            partial_on_fail: AtomicU64::new(0),
            gate_rejected: AtomicU64::new(0),
            at_cap: AtomicU64::new(0),
            no_delta: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            disqualified: AtomicU64::new(0),
        }
    }

    /// Count one resolved gain call.
    pub fn record(&self, outcome: &GainOutcome) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let bucket = match outcome.verdict {
            Verdict::Applied => &self.applied,
            Verdict::PartialOnFail => &self.partial_on_fail,
            Verdict::GateRejected => &self.gate_rejected,
            Verdict::AtCap => &self.at_cap,
            Verdict::NoDelta => &self.no_delta,
            Verdict::Failed => &self.failed,
            Verdict::Disqualified(_) => &self.disqualified,
        };
        bucket.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters for export.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
            partial_on_fail: self.partial_on_fail.load(Ordering::Relaxed),
            gate_rejected: self.gate_rejected.load(Ordering::Relaxed),
            at_cap: self.at_cap.load(Ordering::Relaxed),
            no_delta: self.no_delta.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            disqualified: self.disqualified.load(Ordering::Relaxed),
        }
    }
}

impl Default for ProgressionCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of counter values at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CounterSnapshot {
    /// Gain calls resolved.
    pub attempts: u64,
    /// Deltas applied.
    pub applied: u64,
    /// Failures salvaged.
    pub partial_on_fail: u64,
    /// Gate rejections.
    pub gate_rejected: u64,
    /// Calls at the cap.
    pub at_cap: u64,
    /// Calls with nothing to gain.
    pub no_delta: u64,
    /// Plain failures.
    pub failed: u64,
    /// Hard-gate refusals.
    pub disqualified: u64,
}

impl CounterSnapshot {
    /// Share of attempts that moved a value, in `[0, 1]`.
    #[must_use]
    pub fn apply_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = (self.applied + self.partial_on_fail) as f64 / self.attempts as f64;
        rate
    }
}

// ---------------------------------------------------------------------------
// Tracing span names
// ---------------------------------------------------------------------------

/// Standard tracing span names for progression subsystems.
pub mod spans {
    /// One strategy-driven gain call.
    pub const GAIN: &str = "skillgain::gain";
    /// Resolution of one action event.
    pub const RESOLVE_EVENT: &str = "skillgain::resolve_event";
    /// Parallel resolution of a whole tick.
    pub const RESOLVE_TICK: &str = "skillgain::resolve_tick";
    /// Configuration load.
    pub const CONFIG_LOAD: &str = "skillgain::config_load";
}
