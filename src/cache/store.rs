//! Slug Cache Store Module
//!
//! Single-slot store holding the current campaign slug set behind an
//! atomically swapped pointer.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::cache::CampaignSlugSet;

// == Slug Cache Store ==
/// Lock-free holder of the last committed `CampaignSlugSet`.
///
/// Readers get an `Arc` to a complete snapshot and never wait on the writer.
/// Only the refresh coordinator commits, which is why `commit` is crate-private.
#[derive(Debug)]
pub struct SlugCacheStore {
    current: ArcSwap<CampaignSlugSet>,
}

impl SlugCacheStore {
    // == Constructor ==
    /// Creates a store holding the cold (empty) set.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(CampaignSlugSet::cold()),
        }
    }

    // == Read ==
    /// Returns the last committed set.
    pub fn read(&self) -> Arc<CampaignSlugSet> {
        self.current.load_full()
    }

    // == Commit ==
    /// Replaces the current set; visible to every read that starts afterwards.
    pub(crate) fn commit(&self, set: CampaignSlugSet) {
        self.current.store(Arc::new(set));
    }
}

impl Default for SlugCacheStore {
    fn default() -> Self {
        Self::new()
    }
}
