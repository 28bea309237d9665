//! Storage Layer
//!
//! Read-only access to the `sensor_measurements` table with the repository
//! pattern. Rows are written by an external ingestion process; this crate only
//! creates the table when it is missing and reads from it.

mod model;
mod repository;
mod schema;
mod url;

pub use model::{format_timestamp, SensorMeasurement};
pub use repository::{PoolConfig, Repository};
pub use schema::TABLE_NAME;
pub use url::{normalize_database_url, Backend};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedUrl(String),
}
