//! Lifeboat form server
//!
//! Serves the Titanic survival form over HTTP. The model artifact is loaded
//! once before the listener is bound; if it cannot be loaded the process
//! exits without serving anything.

use lifeboat_server::config::load_app_config;
use lifeboat_server::{build_app_state, build_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_app_config()?;
    info!(
        listen_addr = %config.listen_addr,
        model_path = %config.model_path,
        "Starting Lifeboat server"
    );

    let listen_addr = config.listen_addr.clone();
    let state = build_app_state(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(%listen_addr, "Form server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
