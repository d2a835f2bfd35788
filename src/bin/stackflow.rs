//! Stackflow HTTP server.
//!
//! Usage:
//!
//! ```text
//! STACKFLOW_CONFIG=/etc/stackflow.toml stackflow
//! ```
//!
//! Configuration is read as described in [`stackflow::config`]. With a
//! `database.url` (or `DATABASE_URL`) the server uses `PostgreSQL`, whose
//! schema is created by the SQL files under `migrations/`; without one it
//! keeps everything in memory. The server stops gracefully on Ctrl-C or
//! `SIGTERM`.

use diesel::{
    PgConnection,
    r2d2::{ConnectionManager, Pool},
};
use stackflow::{
    api::{self, AppState, PgPool, Stores},
    config::AppConfig,
    telemetry,
};
use tokio::net::TcpListener;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    telemetry::init_from_config(&config.logging);

    let providers = config.provider_catalog()?;
    let stores = match config.database.url.clone() {
        Some(url) => Stores::postgres(&connect(url, config.database.max_pool_size).await?),
        None => {
            tracing::warn!("no database configured, state is kept in memory");
            Stores::in_memory()
        }
    };

    let address = config.bind_address()?;
    let listener = TcpListener::bind(address).await?;
    tracing::info!(%address, "stackflow listening");
    axum::serve(listener, api::router(AppState::new(stores, providers)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("stackflow stopped");
    Ok(())
}

/// Builds the connection pool; building blocks until the first connection
/// is established.
async fn connect(url: String, max_size: u32) -> Result<PgPool, BoxError> {
    let pool = tokio::task::spawn_blocking(move || {
        Pool::builder()
            .max_size(max_size)
            .build(ConnectionManager::<PgConnection>::new(url))
    })
    .await??;
    tracing::info!(max_size, "database pool ready");
    Ok(pool)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
