//! API Module
//!
//! HTTP handlers and routing for the campaign slug read surface.
//!
//! # Endpoints
//! - `GET /campaign-slugs` - Current slug set
//! - `GET /campaign-slugs/:slug` - Membership check
//! - `POST /campaign-slugs/refresh` - On-demand refresh
//! - `GET /stats` - Refresh statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
