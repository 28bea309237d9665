//! Sensor Readings API Server
//!
//! Serves stored sensor measurements as JSON over three GET routes:
//! `/`, `/sensors` and `/sensors/{room}`.

use anyhow::Context;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
mod routes;
#[cfg(test)]
mod test_support;

pub use crate::config::{ConfigError, HttpConfig, ServerConfig, Settings};
pub use error::ApiError;

use storage::Repository;

/// Application state shared across handlers
pub struct AppState {
    /// Storage repository
    pub repository: Repository,
}

impl AppState {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>, http: &HttpConfig) -> Result<Router, ConfigError> {
    let router = Router::new()
        .route("/", get(routes::root::hello))
        .route("/sensors", get(routes::sensors::get_all))
        .route("/sensors/:room", get(routes::sensors::get_by_room));

    Ok(with_http_layers(router, http)?.with_state(state))
}

/// Tracing, CORS and request timeout, outermost first
fn with_http_layers<S>(router: Router<S>, http: &HttpConfig) -> Result<Router<S>, ConfigError>
where
    S: Clone + Send + Sync + 'static,
{
    Ok(router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(http.cors_layer()?)
            .layer(TimeoutLayer::new(http.request_timeout)),
    ))
}

/// Initialize logging
pub fn init_logging() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

/// Connect to the database, make sure the table exists, then serve until a
/// shutdown signal arrives.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let repository = Repository::connect(&config.database_url, &config.pool)
        .await
        .context("failed to connect to database")?;

    // Before binding, so no request can race table creation
    repository
        .init_schema()
        .await
        .context("failed to create sensor_measurements table")?;

    let state = Arc::new(AppState::new(repository));
    let app = create_router(state, &config.http)?;

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
