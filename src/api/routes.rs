//! API Routes
//!
//! Configures the Axum router with all campaign slug endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, membership_handler, refresh_handler, slugs_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /campaign-slugs` - Current slug set
/// - `GET /campaign-slugs/:slug` - Membership check for one slug
/// - `POST /campaign-slugs/refresh` - On-demand refresh trigger
/// - `GET /stats` - Coordinator state and refresh statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/campaign-slugs", get(slugs_handler))
        .route("/campaign-slugs/refresh", post(refresh_handler))
        .route("/campaign-slugs/:slug", get(membership_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
