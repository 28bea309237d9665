//! Server configuration
//!
//! Only two values come from the environment: `DATABASE_URL` (required) and
//! `PORT` (default 8000). A `.env` file in the working directory is honoured.
//! Everything else is fixed in code via the `Default` impls below.

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use config::{Config, Environment, Map};
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use storage::{normalize_database_url, PoolConfig};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Port used when `PORT` is unset
pub const DEFAULT_PORT: u16 = 8000;

/// The dashboard front end allowed to call this API from a browser
pub const DEFAULT_CORS_ORIGIN: &str = "https://mi-temperature2-monitor-fronmt-end-inky.vercel.app";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid CORS origin: {0:?}")]
    InvalidOrigin(String),
}

/// Values read from the environment
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    database_url: String,
    port: u16,
}

impl Settings {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(Environment::default())
    }

    /// Read settings from an explicit variable map instead of the process
    /// environment
    pub fn from_map(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(Environment::default().source(Some(vars)))
    }

    fn load(env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("port", i64::from(DEFAULT_PORT))?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Connection string with the legacy `postgres://` scheme normalized
    pub fn database_url(&self) -> String {
        normalize_database_url(&self.database_url)
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

/// HTTP layer settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Single origin allowed by the CORS policy
    pub cors_origin: String,
    /// Requests running longer than this get a 408
    pub request_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl HttpConfig {
    /// CORS policy: GET and POST with `Content-Type` / `Authorization` from
    /// the configured origin only. Other origins get no allow headers.
    pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
        let origin = HeaderValue::from_str(&self.cors_origin)
            .map_err(|_| ConfigError::InvalidOrigin(self.cors_origin.clone()))?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list([origin]))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION]))
    }
}

/// Everything `run_server` needs
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub http: HttpConfig,
    pub pool: PoolConfig,
}

impl ServerConfig {
    /// Listen on all interfaces at the configured port
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            database_url: settings.database_url(),
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, settings.port())),
            http: HttpConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}
