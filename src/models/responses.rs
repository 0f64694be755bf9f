//! Response DTOs for the campaign slug API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{CampaignSlugSet, RefreshCycle, RefreshStats, SlugSetStatus};
use crate::config::RefreshMode;
use crate::tasks::{RefreshState, TriggerOutcome};

/// Response body for GET /campaign-slugs
#[derive(Debug, Clone, Serialize)]
pub struct SlugsResponse {
    /// Slugs in any active campaign, sorted case-insensitively
    pub slugs: Vec<String>,
    pub count: usize,
    pub status: SlugSetStatus,
    /// When the served data was fetched; null before the first success
    pub computed_at: Option<DateTime<Utc>>,
}

impl SlugsResponse {
    /// Creates a SlugsResponse from a cache snapshot
    pub fn from_set(set: &CampaignSlugSet) -> Self {
        Self {
            slugs: set.iter().map(str::to_string).collect(),
            count: set.len(),
            status: set.status(),
            computed_at: set.computed_at(),
        }
    }
}

/// Response body for GET /campaign-slugs/:slug
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub slug: String,
    pub in_campaign: bool,
}

impl MembershipResponse {
    pub fn new(slug: impl Into<String>, in_campaign: bool) -> Self {
        Self {
            slug: slug.into(),
            in_campaign,
        }
    }
}

/// Response body for POST /campaign-slugs/refresh
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub outcome: TriggerOutcome,
    /// Whether the call waited for the cycle to finish
    pub mode: RefreshMode,
}

impl RefreshResponse {
    pub fn new(outcome: TriggerOutcome, mode: RefreshMode) -> Self {
        Self { outcome, mode }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub state: RefreshState,
    pub status: SlugSetStatus,
    pub slug_count: usize,
    pub cycles_started: u64,
    pub successes: u64,
    pub failures: u64,
    pub consecutive_failures: u64,
    pub coalesced_triggers: u64,
    pub suppressed_triggers: u64,
    /// successes / (successes + failures)
    pub success_rate: f64,
    pub last_cycle: Option<RefreshCycle>,
}

impl StatusResponse {
    /// Creates a new StatusResponse from coordinator state and statistics
    pub fn new(state: RefreshState, set: &CampaignSlugSet, stats: RefreshStats) -> Self {
        let success_rate = stats.success_rate();
        Self {
            state,
            status: set.status(),
            slug_count: set.len(),
            cycles_started: stats.cycles_started,
            successes: stats.successes,
            failures: stats.failures,
            consecutive_failures: stats.consecutive_failures,
            coalesced_triggers: stats.coalesced_triggers,
            suppressed_triggers: stats.suppressed_triggers,
            success_rate,
            last_cycle: stats.last_cycle,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
