//! Resume Site Cache - content cache and draft autosave for the site backend
//!
//! Serves the draft endpoints and cache diagnostics over HTTP.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resume_site_cache::api::{create_router, AppState};
use resume_site_cache::{Config, SweepTask};

/// Main entry point for the site cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and draft store
/// 4. Start the expired-entry sweep
/// 5. Serve HTTP on the configured port
/// 6. On SIGINT/SIGTERM stop accepting requests and shut the sweep down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resume_site_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Site Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}s, sweep_interval={}s, port={}, autosave_quiet={}ms",
        config.default_ttl, config.sweep_interval, config.server_port, config.autosave_quiet_ms
    );

    let state = AppState::from_config(&config);
    info!("Cache and draft store initialized");

    let sweep = state.cache.spawn_sweeper(config.sweep_interval());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweep.
async fn shutdown_signal(mut sweep: SweepTask) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    sweep.shutdown();
}
