//! Scheduled Refresh Task
//!
//! Background task that fires the coordinator's timer trigger at a fixed
//! interval for the lifetime of the process.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::TriggerKind;
use crate::tasks::{RefreshCoordinator, TriggerOutcome};

/// Spawns the periodic refresh trigger.
///
/// The first tick fires immediately so the cache warms up at startup.
/// Ticks that land while a cycle is in flight or during cooldown are
/// coalesced or suppressed by the coordinator; they never queue up.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let coordinator = RefreshCoordinator::new(source, settings);
/// let refresh_handle = spawn_refresh_task(coordinator.clone());
/// // Later, during shutdown:
/// refresh_handle.abort();
/// ```
pub fn spawn_refresh_task(coordinator: RefreshCoordinator) -> JoinHandle<()> {
    // `interval` panics on a zero period
    let period = coordinator
        .settings()
        .refresh_interval
        .max(Duration::from_millis(1));

    tokio::spawn(async move {
        info!("Starting campaign slug refresh task with interval of {:?}", period);

        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match coordinator.trigger(TriggerKind::Timer) {
                TriggerOutcome::Dispatched => debug!("Timer dispatched a refresh cycle"),
                TriggerOutcome::Coalesced => debug!("Timer tick joined the in-flight cycle"),
                TriggerOutcome::Suppressed => debug!("Timer tick skipped during cooldown"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SlugSetStatus;
    use crate::config::{RefreshMode, RefreshSettings};
    use crate::error::Result;
    use crate::source::{CampaignMembers, CampaignRoster, CampaignSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CampaignSource for Counting {
        async fn fetch_roster(&self) -> Result<CampaignRoster> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(crate::error::RefreshError::SourceUnavailable("down".into()));
            }
            Ok(vec![CampaignMembers::new("A", [format!("project-{call}")])])
        }
    }

    fn settings() -> RefreshSettings {
        RefreshSettings {
            refresh_interval: Duration::from_secs(10),
            cooldown: Duration::from_secs(25),
            fetch_timeout: Duration::from_secs(5),
            mode: RefreshMode::FireAndForget,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_task_warms_cache_immediately() {
        let source = Arc::new(Counting::default());
        let coordinator = RefreshCoordinator::new(source.clone(), settings());

        let handle = spawn_refresh_task(coordinator.clone());
        tokio::time::sleep(Duration::from_millis(1)).await;
        coordinator.wait_for_idle().await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.campaign_slugs().status(), SlugSetStatus::Fresh);
        assert!(coordinator.is_campaign_slug("project-1"));

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_task_fires_every_interval() {
        let source = Arc::new(Counting::default());
        let coordinator = RefreshCoordinator::new(source.clone(), settings());

        let handle = spawn_refresh_task(coordinator.clone());
        // Ticks at 0s, 10s, 20s, 30s
        tokio::time::sleep(Duration::from_secs(35)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        assert!(coordinator.is_campaign_slug("project-4"));

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_task_respects_cooldown() {
        let source = Arc::new(Counting {
            fail: true,
            ..Counting::default()
        });
        let coordinator = RefreshCoordinator::new(source.clone(), settings());

        let handle = spawn_refresh_task(coordinator.clone());
        // Failure at 0s opens a 25s cooldown; ticks at 10s and 20s are
        // suppressed, the 30s tick dispatches again.
        tokio::time::sleep(Duration::from_secs(35)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(coordinator.stats().suppressed_triggers, 2);
        assert_eq!(
            coordinator.campaign_slugs().status(),
            SlugSetStatus::StaleOnError
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_refresh_task_can_be_aborted() {
        let source = Arc::new(Counting::default());
        let coordinator = RefreshCoordinator::new(source, settings());

        let handle = spawn_refresh_task(coordinator);

        // Abort immediately
        handle.abort();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
