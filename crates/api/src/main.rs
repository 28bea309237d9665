//! Sensor Readings API - Main Entry Point

use api::{init_logging, run_server, ServerConfig, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    info!("=== Sensor Readings API v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::from_env()?;
    run_server(ServerConfig::from_settings(&settings)).await
}
