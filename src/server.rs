//! HTTP server initialization and runtime setup.
//!
//! Wires storage, cache and services together and runs the Axum server
//! until Ctrl-C or SIGTERM.

use crate::application::services::{KeyGenerator, MappingService};
use crate::config::Config;
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::{cache, persistence};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the mapping service over the configured store.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub async fn build_mapping_service(
    config: &Config,
) -> Result<Arc<MappingService<dyn MappingRepository>>> {
    let repository = persistence::connect(config).await?;
    let generator = KeyGenerator::new(config.keygen_max_attempts);

    Ok(Arc::new(MappingService::new(repository, generator)))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Mapping store (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let mapping_service = build_mapping_service(&config).await?;
    let cache = cache::connect(&config).await;

    let state = AppState::new(mapping_service, cache, &config.base_url);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
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
