//! Cache Module
//!
//! Provides the atomically swapped campaign slug snapshot and refresh records.

mod slug_set;
mod stats;
mod store;


// Re-export public types
pub use slug_set::{fold_slug, CampaignSlugSet, SlugSetStatus};
pub use stats::{CycleOutcome, RefreshCycle, RefreshStats, TriggerKind};
pub use store::SlugCacheStore;
