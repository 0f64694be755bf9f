//! Refresh Statistics Module
//!
//! Tracks refresh cycles and trigger handling for observability.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::RefreshError;

// == Trigger Kind ==
/// What asked for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Fixed-interval timer
    Timer,
    /// Explicit request from the application
    OnDemand,
}

// == Cycle Outcome ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CycleOutcome {
    Success { slug_count: usize },
    Failure { kind: String, detail: String },
}

// == Refresh Cycle ==
/// Record of one completed refresh attempt. Lives only in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshCycle {
    pub trigger: TriggerKind,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: CycleOutcome,
}

impl RefreshCycle {
    /// Record for a cycle that committed `slug_count` slugs.
    pub fn succeeded(trigger: TriggerKind, started_at: DateTime<Utc>, slug_count: usize) -> Self {
        Self {
            trigger,
            started_at,
            finished_at: Utc::now(),
            outcome: CycleOutcome::Success { slug_count },
        }
    }

    /// Record for a cycle that ended with `error`.
    pub fn failed(trigger: TriggerKind, started_at: DateTime<Utc>, error: &RefreshError) -> Self {
        Self {
            trigger,
            started_at,
            finished_at: Utc::now(),
            outcome: CycleOutcome::Failure {
                kind: error.kind().to_string(),
                detail: error.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Success { .. })
    }
}

// == Refresh Stats ==
/// Counters maintained by the refresh coordinator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshStats {
    /// Worker dispatches performed
    pub cycles_started: u64,
    /// Cycles whose result was committed
    pub successes: u64,
    /// Cycles that ended in an error
    pub failures: u64,
    /// Failures since the last success
    pub consecutive_failures: u64,
    /// Triggers folded into an in-flight cycle
    pub coalesced_triggers: u64,
    /// Triggers rejected during cooldown
    pub suppressed_triggers: u64,
    /// Most recent completed cycle
    pub last_cycle: Option<RefreshCycle>,
}

impl RefreshStats {
    // == Constructor ==
    /// Creates a new RefreshStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Success Rate ==
    /// Returns successes / completed cycles, or 0.0 if none completed.
    pub fn success_rate(&self) -> f64 {
        let total = self.successes + self.failures;
        if total == 0 {
            0.0
        } else {
            self.successes as f64 / total as f64
        }
    }

    pub fn record_dispatch(&mut self) {
        self.cycles_started += 1;
    }

    pub fn record_coalesced(&mut self) {
        self.coalesced_triggers += 1;
    }

    pub fn record_suppressed(&mut self) {
        self.suppressed_triggers += 1;
    }

    // == Record Cycle ==
    /// Folds a completed cycle into the counters.
    pub fn record_cycle(&mut self, cycle: RefreshCycle) {
        if cycle.is_success() {
            self.successes += 1;
            self.consecutive_failures = 0;
        } else {
            self.failures += 1;
            self.consecutive_failures += 1;
        }
        self.last_cycle = Some(cycle);
    }
}
