//! Campaign Source Module
//!
//! The external referral provider is consumed through the `CampaignSource`
//! trait; its roster is normalized into a `CampaignSlugSet`.
//!
//! # Components
//! - `CampaignSource`: async seam over the provider
//! - `HttpCampaignSource`: reqwest-backed JSON client
//! - `normalize_roster` / `fetch_campaign_slugs`: all-or-nothing normalization

mod http;
mod normalize;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use http::HttpCampaignSource;
pub use normalize::{fetch_campaign_slugs, normalize_roster};

// == Roster Model ==
/// One campaign and the projects enrolled in it, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignMembers {
    /// Provider-side campaign identifier
    pub campaign: String,
    /// Member project slugs, possibly repeated or mixed-case
    pub projects: Vec<String>,
    /// Inactive campaigns are reported but contribute no slugs
    #[serde(default = "default_active")]
    pub active: bool,
}

impl CampaignMembers {
    /// Creates an active campaign entry.
    pub fn new<I, S>(campaign: impl Into<String>, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            campaign: campaign.into(),
            projects: projects.into_iter().map(Into::into).collect(),
            active: true,
        }
    }
}

fn default_active() -> bool {
    true
}

/// Full provider answer: every campaign it knows about.
pub type CampaignRoster = Vec<CampaignMembers>;

// == Campaign Source Trait ==
/// Opaque provider of the current campaign roster.
///
/// Implementations may be slow or unavailable; retries are not their concern.
/// The future must be `Send` because it runs on the isolated refresh worker.
#[async_trait]
pub trait CampaignSource: Send + Sync {
    /// Fetches the current roster.
    async fn fetch_roster(&self) -> Result<CampaignRoster>;
}
