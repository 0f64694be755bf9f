//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::time::Duration;

use serde::Serialize;

/// How on-demand refresh callers are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshMode {
    /// Return as soon as the trigger is registered
    FireAndForget,
    /// Wait until the dispatched (or in-flight) cycle has completed
    WaitForCompletion,
}

/// Timing and behavior knobs consumed by the refresh coordinator.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    /// Period of the timer trigger
    pub refresh_interval: Duration,
    /// Backoff window entered after a failed cycle
    pub cooldown: Duration,
    /// Upper bound for a single fetch inside the worker
    pub fetch_timeout: Duration,
    /// Behavior of `request_refresh`
    pub mode: RefreshMode,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Config::default().refresh_settings()
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the campaign provider
    pub source_url: String,
    /// Optional bearer token for the campaign provider
    pub source_api_key: Option<String>,
    /// Provider request timeout in seconds
    pub source_timeout: u64,
    /// Refresh timer interval in seconds
    pub refresh_interval: u64,
    /// Cooldown after a failed refresh in seconds
    pub refresh_cooldown: u64,
    /// Whether on-demand refresh requests wait for completion
    pub refresh_mode: RefreshMode,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CAMPAIGN_SOURCE_URL` - Provider base URL (default: http://localhost:4000)
    /// - `CAMPAIGN_SOURCE_API_KEY` - Provider bearer token (default: none)
    /// - `SOURCE_TIMEOUT` - Provider timeout in seconds (default: 10)
    /// - `REFRESH_INTERVAL` - Refresh frequency in seconds (default: 300)
    /// - `REFRESH_COOLDOWN` - Backoff after a failure in seconds (default: 60)
    /// - `REFRESH_WAIT` - `true` to block on-demand callers until done (default: false)
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable lookup, falling back to defaults
    /// for missing or unparsable values. Zero timeouts and intervals are
    /// rejected.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            server_port: parse_var::<u16, _>(&var, "SERVER_PORT").unwrap_or(defaults.server_port),
            source_url: var("CAMPAIGN_SOURCE_URL").unwrap_or(defaults.source_url),
            source_api_key: var("CAMPAIGN_SOURCE_API_KEY").filter(|key| !key.trim().is_empty()),
            source_timeout: parse_var::<u64, _>(&var, "SOURCE_TIMEOUT")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.source_timeout),
            refresh_interval: parse_var::<u64, _>(&var, "REFRESH_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.refresh_interval),
            refresh_cooldown: parse_var::<u64, _>(&var, "REFRESH_COOLDOWN")
                .unwrap_or(defaults.refresh_cooldown),
            refresh_mode: match parse_var::<bool, _>(&var, "REFRESH_WAIT") {
                Some(true) => RefreshMode::WaitForCompletion,
                Some(false) => RefreshMode::FireAndForget,
                None => defaults.refresh_mode,
            },
        }
    }

    /// Builds the coordinator settings from this configuration.
    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            refresh_interval: Duration::from_secs(self.refresh_interval),
            cooldown: Duration::from_secs(self.refresh_cooldown),
            fetch_timeout: Duration::from_secs(self.source_timeout),
            mode: self.refresh_mode,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            source_url: "http://localhost:4000".to_string(),
            source_api_key: None,
            source_timeout: 10,
            refresh_interval: 300,
            refresh_cooldown: 60,
            refresh_mode: RefreshMode::FireAndForget,
        }
    }
}

fn parse_var<T, F>(var: &F, name: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(name).and_then(|v| v.trim().parse().ok())
}
