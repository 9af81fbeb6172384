//! Agri Portal server binary
//!
//! Configuration comes from the environment (see `agri_portal_core::config`);
//! a `.env` file in the working directory is honoured.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agri_portal_core::ServerConfig;
use agri_portal_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "agri_portal_server=debug,agri_portal_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Agri Portal server");

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let addr = config.bind_addr().await?;

    if config.index_file().is_file() {
        tracing::info!("Serving static files from: {}", config.static_dir.display());
    } else {
        tracing::warn!(
            "No index.html under {}; non-API routes will answer 404 until the bundle is built",
            config.static_dir.display()
        );
    }
    tracing::info!("Service catalog: {} entries", config.catalog.len());

    let app = build_router(AppState::from_config(&config));

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!("Port {} is already in use, set PORT to another value", addr.port());
            }
            return Err(e).with_context(|| format!("failed to bind to {addr}"));
        }
    };

    tracing::info!("Agri Portal listening on http://{}", addr);
    tracing::info!("API Endpoints:");
    tracing::info!("  POST /api/chat      - Keyword reply");
    tracing::info!("  GET  /api/health    - Health check");
    tracing::info!("  GET  /api/services  - AI service catalog");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Agri Portal stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
