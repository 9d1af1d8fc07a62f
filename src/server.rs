//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, the retention sweeper, and the Axum
//! server lifecycle.

use crate::application::expiry_sweeper::run_expiry_sweeper;
use crate::application::services::{LinkService, LinkStore};
use crate::config::Config;
use crate::infrastructure::persistence::{SqliteLinkRepository, open_database};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool
/// - Schema migrations
/// - Background retention sweeper
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The database cannot be opened or migrated
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = open_database(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Database ready");

    let repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));
    let store = Arc::new(LinkStore::new(repository, config.code_length));
    let link_service = Arc::new(LinkService::new(store.clone(), config.short_domain.clone()));

    let sweeper = tokio::spawn(run_expiry_sweeper(
        store,
        config.retention_days,
        config.sweep_interval(),
    ));
    tracing::info!(
        retention_days = config.retention_days,
        "Expiry sweeper started"
    );

    let app = app_router(AppState::new(link_service));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
