//! Repository Implementation

use crate::model::SensorMeasurement;
use crate::schema::{self, SELECT_ALL, SELECT_BY_NAME};
use crate::url::{normalize_database_url, Backend};
use crate::StorageError;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Connection pool settings
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on open connections
    pub max_connections: u32,
    /// How long a request waits for a free connection before failing
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
enum Pool {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

/// Read access to stored sensor measurements.
///
/// Cheap to clone: clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: Pool,
}

impl Repository {
    /// Open a connection pool for the backend named by the URL scheme.
    ///
    /// A legacy `postgres://` prefix is accepted and normalized first.
    pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<Self, StorageError> {
        let url = normalize_database_url(database_url);
        let backend = Backend::from_url(&url)?;

        let pool = match backend {
            Backend::Sqlite => {
                let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
                let pool = SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.acquire_timeout)
                    .connect_with(options)
                    .await?;
                Pool::Sqlite(pool)
            }
            Backend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.acquire_timeout)
                    .connect(&url)
                    .await?;
                Pool::Postgres(pool)
            }
        };

        info!(%backend, max_connections = config.max_connections, "Connected to database");
        Ok(Self { pool })
    }

    /// Wrap an existing SQLite pool
    pub fn from_sqlite_pool(pool: SqlitePool) -> Self {
        Self {
            pool: Pool::Sqlite(pool),
        }
    }

    /// Wrap an existing PostgreSQL pool
    pub fn from_pg_pool(pool: PgPool) -> Self {
        Self {
            pool: Pool::Postgres(pool),
        }
    }

    pub fn backend(&self) -> Backend {
        match self.pool {
            Pool::Sqlite(_) => Backend::Sqlite,
            Pool::Postgres(_) => Backend::Postgres,
        }
    }

    /// Create the measurements table if it is missing. Existing rows are left
    /// untouched, so this is safe to run on every start.
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        match &self.pool {
            Pool::Sqlite(pool) => schema::create_sqlite(pool).await?,
            Pool::Postgres(pool) => schema::create_postgres(pool).await?,
        }
        Ok(())
    }

    /// Every stored measurement, in whatever order the database returns them.
    ///
    /// Unbounded: there is no limit or pagination.
    pub async fn list_all(&self) -> Result<Vec<SensorMeasurement>, StorageError> {
        let rows = match &self.pool {
            Pool::Sqlite(pool) => {
                sqlx::query_as::<_, SensorMeasurement>(SELECT_ALL)
                    .fetch_all(pool)
                    .await?
            }
            Pool::Postgres(pool) => {
                sqlx::query_as::<_, SensorMeasurement>(SELECT_ALL)
                    .fetch_all(pool)
                    .await?
            }
        };

        debug!(count = rows.len(), "Loaded all measurements");
        Ok(rows)
    }

    /// Measurements whose `sensor_name` equals `name` exactly (case-sensitive).
    /// No match yields an empty vec.
    pub async fn list_by_name(&self, name: &str) -> Result<Vec<SensorMeasurement>, StorageError> {
        let rows = match &self.pool {
            Pool::Sqlite(pool) => {
                sqlx::query_as::<_, SensorMeasurement>(SELECT_BY_NAME)
                    .bind(name)
                    .fetch_all(pool)
                    .await?
            }
            Pool::Postgres(pool) => {
                sqlx::query_as::<_, SensorMeasurement>(SELECT_BY_NAME)
                    .bind(name)
                    .fetch_all(pool)
                    .await?
            }
        };

        debug!(sensor_name = name, count = rows.len(), "Loaded measurements by name");
        Ok(rows)
    }
}
