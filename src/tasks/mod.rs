//! Background Tasks Module
//!
//! Contains the refresh machinery that keeps the campaign slug cache current.
//!
//! # Tasks
//! - Refresh worker: one isolated fetch-and-normalize attempt per dispatch
//! - Refresh coordinator: single-flight scheduling, cooldown and commits
//! - Scheduled refresh: fixed-interval timer trigger

mod coordinator;
mod refresh;
mod worker;

pub use coordinator::{RefreshCoordinator, RefreshState, TriggerOutcome};
pub use refresh::spawn_refresh_task;
pub use worker::RefreshWorker;
