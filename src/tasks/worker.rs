//! Refresh Worker
//!
//! Runs one fetch-and-normalize attempt on its own task so provider latency
//! never occupies the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::CampaignSlugSet;
use crate::error::{RefreshError, Result};
use crate::source::{fetch_campaign_slugs, CampaignSource};

/// Dispatches isolated refresh attempts against a campaign source.
///
/// Each dispatch spawns a fresh task that owns only a handle to the source
/// and hands back an immutable set. No retries happen here.
#[derive(Clone)]
pub struct RefreshWorker {
    source: Arc<dyn CampaignSource>,
    fetch_timeout: Duration,
}

impl RefreshWorker {
    pub fn new(source: Arc<dyn CampaignSource>, fetch_timeout: Duration) -> Self {
        Self {
            source,
            fetch_timeout,
        }
    }

    /// Runs exactly one attempt and waits for its result without blocking
    /// the calling task's executor thread.
    ///
    /// # Errors
    /// - `SourceUnavailable` when the source fails or exceeds `fetch_timeout`
    /// - `MalformedResponse` when the roster cannot be normalized
    /// - `WorkerDispatchFailure` when the spawned task panics or is cancelled
    pub async fn dispatch(&self) -> Result<CampaignSlugSet> {
        let source = Arc::clone(&self.source);
        let fetch_timeout = self.fetch_timeout;

        let handle = tokio::spawn(async move {
            match tokio::time::timeout(fetch_timeout, fetch_campaign_slugs(source.as_ref())).await
            {
                Ok(result) => result,
                Err(_) => Err(RefreshError::SourceUnavailable(format!(
                    "no response within {:?}",
                    fetch_timeout
                ))),
            }
        });

        debug!("Refresh worker dispatched");
        handle
            .await
            .map_err(|err| RefreshError::WorkerDispatchFailure(err.to_string()))?
    }
}
