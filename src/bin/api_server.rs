// src/bin/api_server.rs

use anyhow::Context;
use movies_api::transport::http::{create_app, AppState, CorsPolicy};
use movies_api::{MovieStore, ServerConfig};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // --- Store Initialization ---
    info!(path = %config.seed_path.display(), "loading seed movies");
    let store = MovieStore::load(&config.seed_path)?;
    info!(count = store.len(), "movie store initialized");

    // --- API Server Initialization ---
    let cors = CorsPolicy::new(&config.allowed_origins)?;
    info!(origins = ?config.allowed_origins, "CORS allow-list");
    let app = create_app(AppState::new(store), cors);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("server listening on http://localhost:{}", config.port);
    info!("Swagger UI available at http://localhost:{}/swagger-ui", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received (Ctrl+C)");
}
