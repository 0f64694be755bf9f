//! Refresh Coordinator
//!
//! Owns the slug cache, decides when refresh cycles run and commits their
//! results. At most one cycle is in flight at any time.
//!
//! ```text
//!          trigger                 success
//!   Idle ───────────▶ Refreshing ───────────▶ Idle
//!    ▲                    │
//!    │ cooldown elapsed   │ failure
//!    └──── Cooldown ◀─────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::{CampaignSlugSet, RefreshCycle, RefreshStats, SlugCacheStore, TriggerKind};
use crate::config::{RefreshMode, RefreshSettings};
use crate::error::Result;
use crate::source::CampaignSource;
use crate::tasks::RefreshWorker;

/// Longest cooldown honored; larger settings are clamped to it.
const MAX_COOLDOWN: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Coordinator State ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    Idle,
    Refreshing,
    Cooldown,
}

/// What happened to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// A new worker dispatch was started
    Dispatched,
    /// Folded into the cycle already in flight
    Coalesced,
    /// Rejected because the coordinator is cooling down after a failure
    Suppressed,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Refreshing,
    Cooldown { until: Instant },
}

#[derive(Debug)]
struct Shared {
    phase: Phase,
    stats: RefreshStats,
    /// Number of completed cycles
    generation: u64,
}

struct Inner {
    store: SlugCacheStore,
    worker: RefreshWorker,
    settings: RefreshSettings,
    shared: Mutex<Shared>,
    completed: watch::Sender<u64>,
}

// == Refresh Coordinator ==
/// Cheaply cloneable handle to the refresh coordinator.
///
/// Reads go straight to the slug cache store and never wait on a refresh.
/// Triggers either start a cycle, join the one in flight, or are dropped
/// while the coordinator is cooling down after a failure.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

impl RefreshCoordinator {
    // == Constructor ==
    /// Creates a coordinator with a cold cache. No cycle runs until triggered.
    pub fn new(source: Arc<dyn CampaignSource>, settings: RefreshSettings) -> Self {
        let worker = RefreshWorker::new(source, settings.fetch_timeout);
        let (completed, _) = watch::channel(0);

        Self {
            inner: Arc::new(Inner {
                store: SlugCacheStore::new(),
                worker,
                settings,
                shared: Mutex::new(Shared {
                    phase: Phase::Idle,
                    stats: RefreshStats::new(),
                    generation: 0,
                }),
                completed,
            }),
        }
    }

    // == Read API ==
    /// Returns the current slug set. Never fetches and never fails.
    pub fn campaign_slugs(&self) -> Arc<CampaignSlugSet> {
        self.inner.store.read()
    }

    /// Case-insensitive membership check against the current set.
    pub fn is_campaign_slug(&self, slug: &str) -> bool {
        self.inner.store.read().contains(slug)
    }

    pub fn settings(&self) -> &RefreshSettings {
        &self.inner.settings
    }

    /// Current state; an elapsed cooldown reads as `Idle`.
    pub fn state(&self) -> RefreshState {
        match self.lock().phase {
            Phase::Idle => RefreshState::Idle,
            Phase::Refreshing => RefreshState::Refreshing,
            Phase::Cooldown { until } if Instant::now() < until => RefreshState::Cooldown,
            Phase::Cooldown { .. } => RefreshState::Idle,
        }
    }

    /// Snapshot of the refresh counters.
    pub fn stats(&self) -> RefreshStats {
        self.lock().stats.clone()
    }

    // == Triggers ==
    /// On-demand refresh honoring the configured `RefreshMode`.
    ///
    /// In `WaitForCompletion` mode a dispatched or coalesced request resolves
    /// once that cycle has finished. Suppressed requests return at once.
    pub async fn request_refresh(&self) -> TriggerOutcome {
        let (outcome, target) = self.start(TriggerKind::OnDemand);

        if self.inner.settings.mode == RefreshMode::WaitForCompletion {
            if let Some(generation) = target {
                self.wait_for_generation(generation).await;
            }
        }
        outcome
    }

    /// Registers a trigger without waiting for the result.
    pub fn trigger(&self, kind: TriggerKind) -> TriggerOutcome {
        self.start(kind).0
    }

    /// Resolves once no cycle is in flight.
    pub async fn wait_for_idle(&self) {
        let target = {
            let shared = self.lock();
            match shared.phase {
                Phase::Refreshing => shared.generation + 1,
                _ => return,
            }
        };
        self.wait_for_generation(target).await;
    }

    // == Cycle Driving ==
    /// Applies the single-flight and cooldown rules.
    ///
    /// Returns the outcome and, unless suppressed, the generation number the
    /// relevant cycle will publish on completion.
    fn start(&self, kind: TriggerKind) -> (TriggerOutcome, Option<u64>) {
        let mut shared = self.lock();
        let phase = shared.phase;

        match phase {
            Phase::Refreshing => {
                shared.stats.record_coalesced();
                debug!("{:?} refresh trigger coalesced into in-flight cycle", kind);
                return (TriggerOutcome::Coalesced, Some(shared.generation + 1));
            }
            Phase::Cooldown { until } if Instant::now() < until => {
                shared.stats.record_suppressed();
                debug!(
                    "{:?} refresh trigger suppressed, cooldown ends in {:?}",
                    kind,
                    until - Instant::now()
                );
                return (TriggerOutcome::Suppressed, None);
            }
            Phase::Idle | Phase::Cooldown { .. } => {}
        }

        shared.phase = Phase::Refreshing;
        shared.stats.record_dispatch();
        let target = shared.generation + 1;
        drop(shared);

        let this = self.clone();
        tokio::spawn(async move {
            this.run_cycle(kind).await;
        });

        (TriggerOutcome::Dispatched, Some(target))
    }

    async fn run_cycle(&self, kind: TriggerKind) {
        let started_at = Utc::now();
        info!("Campaign slug refresh started ({:?})", kind);

        let mut guard = CycleGuard {
            coordinator: self,
            armed: true,
        };
        let result = self.inner.worker.dispatch().await;
        self.complete(kind, started_at, result);
        guard.armed = false;
    }

    /// Commits or discards a cycle's result and leaves the `Refreshing` phase.
    fn complete(
        &self,
        kind: TriggerKind,
        started_at: chrono::DateTime<Utc>,
        result: Result<CampaignSlugSet>,
    ) {
        let mut shared = self.lock();

        let cycle = match result {
            Ok(set) => {
                let count = set.len();
                if set.same_slugs(&self.inner.store.read()) {
                    debug!("Campaign slug set unchanged since last commit");
                }
                self.inner.store.commit(set);
                shared.phase = Phase::Idle;
                info!("Campaign slug refresh committed {} slugs", count);
                RefreshCycle::succeeded(kind, started_at, count)
            }
            Err(err) => {
                let stale = self.inner.store.read().mark_stale();
                self.inner.store.commit(stale);
                shared.phase = Phase::Cooldown {
                    until: cooldown_deadline(self.inner.settings.cooldown),
                };
                warn!(
                    "Campaign slug refresh failed, serving stale set for {:?}: {}",
                    self.inner.settings.cooldown, err
                );
                RefreshCycle::failed(kind, started_at, &err)
            }
        };

        shared.stats.record_cycle(cycle);
        shared.generation += 1;
        self.inner.completed.send_replace(shared.generation);
    }

    async fn wait_for_generation(&self, generation: u64) {
        let mut completed = self.inner.completed.subscribe();
        let _ = completed.wait_for(|done| *done >= generation).await;
    }

    /// Leaves `Refreshing` and wakes waiters for a cycle that never reached
    /// `complete`.
    fn abandon_cycle(&self) {
        let mut shared = self.lock();
        if matches!(shared.phase, Phase::Refreshing) {
            shared.phase = Phase::Idle;
            shared.generation += 1;
            self.inner.completed.send_replace(shared.generation);
            warn!("Campaign slug refresh abandoned before completion");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner
            .shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the `Refreshing` phase if a cycle unwinds or is cancelled.
struct CycleGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    armed: bool,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.coordinator.abandon_cycle();
        }
    }
}

/// End of a cooldown starting now, clamped when `cooldown` overflows the clock.
fn cooldown_deadline(cooldown: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(cooldown)
        .or_else(|| now.checked_add(MAX_COOLDOWN))
        .unwrap_or(now)
}
