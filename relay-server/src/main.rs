use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use relay_server::config::{AppConfig, DEFAULT_CONFIG_PATH};
use relay_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Config file location can be overridden for local runs
    let config_path = std::env::var("RELAY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::from_env(&config_path)?;

    let state = AppState::from_config(&config)?;
    info!(
        chat = state.chat.is_some(),
        voice = state.voice.is_some(),
        pubsub = state.pubsub.is_some(),
        line = state.line.is_some(),
        time_zone = %state.time_zone,
        "configured upstreams"
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Relay server listening on http://{addr}");
    info!("  GET       /health    - Health check");
    info!("  GET       /nextrain  - Time until the next train (from, to, res_type)");
    info!("  GET/POST  /chat      - Chat form");
    info!("  GET       /voice     - Voice relay form (speaker, message)");
    info!("  GET       /pubsub    - Publish query parameters (topic, ...)");
    info!("  POST      /webhook   - LINE webhook echo");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
