//! # icmsst-api — Binary Entry Point
//!
//! Loads configuration from the environment, the reference pack and the
//! pricing profile, then serves the router. Binds to `PORT` (default 8080).

use icmsst_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(?config, "starting icmsst-api");

    let state = AppState::try_from_config(config).map_err(|e| {
        tracing::error!("startup failed: {e}");
        e
    })?;
    let port = state.config.port;
    tracing::info!(
        ncm_entries = state.pack.ncm.len(),
        uf_entries = state.pack.uf.len(),
        "reference data ready"
    );

    let app = icmsst_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("icmsst-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
