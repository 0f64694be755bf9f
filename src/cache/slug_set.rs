//! Campaign Slug Set Module
//!
//! Defines the immutable snapshot of project slugs enrolled in active campaigns.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Slug Set Status ==
/// Freshness of a published slug set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlugSetStatus {
    /// No refresh cycle has completed yet
    Cold,
    /// Produced by the most recent cycle, which succeeded
    Fresh,
    /// Last good data kept because the most recent cycle failed
    StaleOnError,
}

// == Campaign Slug Set ==
/// Immutable set of project slugs tagged with when and how it was produced.
///
/// Slugs are unique under case folding; the first spelling seen is the one
/// reported. Cloning is cheap since the slug map is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSlugSet {
    /// Folded slug -> display slug
    slugs: Arc<BTreeMap<String, String>>,
    /// When the underlying data was fetched, None while cold
    computed_at: Option<DateTime<Utc>>,
    status: SlugSetStatus,
}

impl CampaignSlugSet {
    // == Constructors ==
    /// Creates the empty set served before the first refresh completes.
    pub fn cold() -> Self {
        Self {
            slugs: Arc::new(BTreeMap::new()),
            computed_at: None,
            status: SlugSetStatus::Cold,
        }
    }

    /// Creates a fresh set from already-validated slugs.
    ///
    /// # Arguments
    /// * `slugs` - Slugs in source order; later case-insensitive duplicates are dropped
    /// * `computed_at` - Time the roster was fetched
    pub fn fresh<I, S>(slugs: I, computed_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for slug in slugs {
            let slug = slug.into();
            map.entry(fold_slug(&slug)).or_insert(slug);
        }

        Self {
            slugs: Arc::new(map),
            computed_at: Some(computed_at),
            status: SlugSetStatus::Fresh,
        }
    }

    // == Stale Marking ==
    /// Returns a copy with identical content marked `StaleOnError`.
    pub fn mark_stale(&self) -> Self {
        Self {
            slugs: Arc::clone(&self.slugs),
            computed_at: self.computed_at,
            status: SlugSetStatus::StaleOnError,
        }
    }

    // == Accessors ==
    pub fn status(&self) -> SlugSetStatus {
        self.status
    }

    pub fn computed_at(&self) -> Option<DateTime<Utc>> {
        self.computed_at
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    /// Case-insensitive membership check.
    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.contains_key(&fold_slug(slug))
    }

    /// Iterates display slugs ordered by their folded form.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.slugs.values().map(String::as_str)
    }

    /// Returns the display slugs as an owned set.
    #[cfg(test)]
    pub(crate) fn to_hash_set(&self) -> std::collections::HashSet<String> {
        self.slugs.values().cloned().collect()
    }

    /// True when both sets hold the same slugs, ignoring status and timestamp.
    pub fn same_slugs(&self, other: &CampaignSlugSet) -> bool {
        Arc::ptr_eq(&self.slugs, &other.slugs) || self.slugs == other.slugs
    }
}

impl Default for CampaignSlugSet {
    fn default() -> Self {
        Self::cold()
    }
}

// == Utility Functions ==
/// Canonical comparison key for a slug.
pub fn fold_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cold_set_is_empty() {
        let set = CampaignSlugSet::cold();

        assert!(set.is_empty());
        assert_eq!(set.status(), SlugSetStatus::Cold);
        assert!(set.computed_at().is_none());
    }

    #[test]
    fn test_fresh_keeps_first_spelling() {
        let set = CampaignSlugSet::fresh(["X", "x", "Y"], Utc::now());

        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["X", "Y"]);
        assert_eq!(set.status(), SlugSetStatus::Fresh);
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let set = CampaignSlugSet::fresh(["Save-The-Oceans"], Utc::now());

        assert!(set.contains("save-the-oceans"));
        assert!(set.contains(" SAVE-THE-OCEANS "));
        assert!(!set.contains("save-the-forests"));
    }

    #[test]
    fn test_mark_stale_preserves_content() {
        let computed_at = Utc::now();
        let set = CampaignSlugSet::fresh(["a", "b"], computed_at);
        let stale = set.mark_stale();

        assert_eq!(stale.status(), SlugSetStatus::StaleOnError);
        assert_eq!(stale.computed_at(), Some(computed_at));
        assert!(stale.same_slugs(&set));
        // Original snapshot is untouched
        assert_eq!(set.status(), SlugSetStatus::Fresh);
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&SlugSetStatus::StaleOnError).unwrap();
        assert_eq!(json, "\"stale-on-error\"");
    }
}
