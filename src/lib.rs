//! Campaign Slugs - background-refreshed campaign membership cache
//!
//! Keeps the set of project slugs enrolled in active referral campaigns in
//! memory, refreshed off the request path by an isolated worker.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::{spawn_refresh_task, RefreshCoordinator};
