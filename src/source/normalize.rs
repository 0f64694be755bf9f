//! Roster normalization
//!
//! Turns a provider roster into the canonical slug set. A single invalid
//! entry rejects the whole roster.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{CampaignMembers, CampaignSource};
use crate::cache::CampaignSlugSet;
use crate::error::{RefreshError, Result};

/// Builds the set of slugs enrolled in any active campaign.
///
/// Slugs are trimmed and de-duplicated case-insensitively; campaigns with no
/// members or flagged inactive contribute nothing. A blank campaign id or a
/// blank slug anywhere in the roster fails with `MalformedResponse`.
pub fn normalize_roster(
    roster: &[CampaignMembers],
    computed_at: DateTime<Utc>,
) -> Result<CampaignSlugSet> {
    let mut slugs = Vec::new();

    for (index, members) in roster.iter().enumerate() {
        if members.campaign.trim().is_empty() {
            return Err(RefreshError::MalformedResponse(format!(
                "campaign at index {} has no identifier",
                index
            )));
        }

        for slug in &members.projects {
            let slug = slug.trim();
            if slug.is_empty() {
                return Err(RefreshError::MalformedResponse(format!(
                    "campaign '{}' lists a blank project slug",
                    members.campaign
                )));
            }
            if members.active {
                slugs.push(slug.to_string());
            }
        }
    }

    Ok(CampaignSlugSet::fresh(slugs, computed_at))
}

/// Queries `source` once and normalizes the result.
pub async fn fetch_campaign_slugs(source: &dyn CampaignSource) -> Result<CampaignSlugSet> {
    let roster = source.fetch_roster().await?;
    let set = normalize_roster(&roster, Utc::now())?;

    debug!(
        "Normalized {} campaigns into {} slugs",
        roster.len(),
        set.len()
    );
    Ok(set)
}
