//! Campaign Slugs - background-refreshed campaign membership cache
//!
//! Serves the campaign slug set over HTTP while a background task keeps it
//! in sync with the referral provider.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campaign_slugs::api::create_router;
use campaign_slugs::{spawn_refresh_task, AppState, Config};

/// Main entry point for the campaign slug service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the provider client and refresh coordinator
/// 4. Start the periodic refresh task (first cycle runs immediately)
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_slugs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting campaign slug service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: source={}, interval={}s, cooldown={}s, timeout={}s, mode={:?}, port={}",
        config.source_url,
        config.refresh_interval,
        config.refresh_cooldown,
        config.source_timeout,
        config.refresh_mode,
        config.server_port
    );

    let state = AppState::from_config(&config).context("failed to build campaign source")?;
    info!("Refresh coordinator initialized with cold cache");

    let refresh_handle = spawn_refresh_task(state.coordinator.clone());
    info!("Background refresh task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(refresh_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the refresh task and allows graceful shutdown.
async fn shutdown_signal(refresh_handle: JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    refresh_handle.abort();
    warn!("Refresh task aborted");
}
