//! API Handlers
//!
//! HTTP request handlers reading from and triggering the campaign slug cache.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::config::Config;
use crate::error::Result;
use crate::models::{
    HealthResponse, MembershipResponse, RefreshResponse, SlugsResponse, StatusResponse,
};
use crate::source::HttpCampaignSource;
use crate::tasks::RefreshCoordinator;

/// Application state shared across all handlers.
///
/// Holds the refresh coordinator, which is itself a cheap cloneable handle.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: RefreshCoordinator,
}

impl AppState {
    /// Creates a new AppState around an existing coordinator.
    pub fn new(coordinator: RefreshCoordinator) -> Self {
        Self { coordinator }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Wires an HTTP campaign source into a coordinator with a cold cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = HttpCampaignSource::from_config(config)?;
        let coordinator = RefreshCoordinator::new(Arc::new(source), config.refresh_settings());
        Ok(Self::new(coordinator))
    }
}

/// Handler for GET /campaign-slugs
///
/// Returns the current slug set straight from the cache.
pub async fn slugs_handler(State(state): State<AppState>) -> Json<SlugsResponse> {
    let set = state.coordinator.campaign_slugs();
    Json(SlugsResponse::from_set(&set))
}

/// Handler for GET /campaign-slugs/:slug
pub async fn membership_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Json<MembershipResponse> {
    let in_campaign = state.coordinator.is_campaign_slug(&slug);
    Json(MembershipResponse::new(slug, in_campaign))
}

/// Handler for POST /campaign-slugs/refresh
///
/// Registers an on-demand refresh. Whether it waits for the cycle depends on
/// the configured refresh mode.
pub async fn refresh_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<RefreshResponse>) {
    let outcome = state.coordinator.request_refresh().await;
    let mode = state.coordinator.settings().mode;

    (StatusCode::ACCEPTED, Json(RefreshResponse::new(outcome, mode)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let coordinator = &state.coordinator;
    Json(StatusResponse::new(
        coordinator.state(),
        &coordinator.campaign_slugs(),
        coordinator.stats(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SlugSetStatus;
    use crate::config::{RefreshMode, RefreshSettings};
    use crate::source::{CampaignMembers, CampaignRoster, CampaignSource};
    use crate::tasks::TriggerOutcome;
    use async_trait::async_trait;

    struct Fixed;

    #[async_trait]
    impl CampaignSource for Fixed {
        async fn fetch_roster(&self) -> Result<CampaignRoster> {
            Ok(vec![CampaignMembers::new("A", ["Clean-Water", "school-meals"])])
        }
    }

    fn test_state() -> AppState {
        let settings = RefreshSettings {
            mode: RefreshMode::WaitForCompletion,
            ..RefreshSettings::default()
        };
        AppState::new(RefreshCoordinator::new(Arc::new(Fixed), settings))
    }

    #[tokio::test]
    async fn test_slugs_handler_cold() {
        let state = test_state();

        let response = slugs_handler(State(state)).await;
        assert_eq!(response.count, 0);
        assert_eq!(response.status, SlugSetStatus::Cold);
    }

    #[tokio::test]
    async fn test_refresh_then_read() {
        let state = test_state();

        let (status, response) = refresh_handler(State(state.clone())).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(response.outcome, TriggerOutcome::Dispatched);

        let response = slugs_handler(State(state.clone())).await;
        assert_eq!(response.slugs, vec!["Clean-Water", "school-meals"]);

        let response = membership_handler(State(state), Path("clean-water".to_string())).await;
        assert!(response.in_campaign);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        refresh_handler(State(state.clone())).await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.cycles_started, 1);
        assert_eq!(response.successes, 1);
        assert_eq!(response.slug_count, 2);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_from_config_builds_state() {
        let state = AppState::from_config(&Config::default());
        assert!(state.is_ok());
    }
}
