//! Sheet Pager - HTTP front end for the pagination engine
//!
//! Opens spreadsheets and delimited files from the local filesystem and serves them page by
//! page, reloading a document when its file changes on disk.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheet_pager::api::{create_router, AppState};
use sheet_pager::source::{FormatParser, FsFileAccess};
use sheet_pager::{CacheCoordinator, Config};

/// Main entry point for the Sheet Pager server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache coordinator with filesystem access and the format parser
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. On SIGINT/SIGTERM, stop accepting requests and close all documents
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheet_pager=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sheet Pager");

    let config = Config::from_env();
    info!(
        "Configuration loaded: workbook_cache={}, page_cache={}, rows_per_page={}, max_columns={}, port={}, watch_interval={}ms",
        config.workbook_cache_capacity,
        config.page_cache_capacity,
        config.rows_per_page,
        config.max_columns,
        config.server_port,
        config.watch_interval_ms
    );

    let files = Arc::new(FsFileAccess::new(Duration::from_millis(
        config.watch_interval_ms,
    )));
    let port = config.server_port;
    let state = AppState::from_config(config, files, Arc::new(FormatParser));
    let coordinator = state.coordinator.clone();
    info!("Cache coordinator initialized");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(coordinator))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then closes every open
/// document so their watchers stop.
async fn shutdown_signal(coordinator: CacheCoordinator) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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

    coordinator.shutdown().await;
    warn!("Document watchers stopped");
}
