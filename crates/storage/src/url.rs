//! Database URL handling

use crate::StorageError;
use std::fmt;

const LEGACY_POSTGRES_SCHEME: &str = "postgres://";
const POSTGRES_SCHEME: &str = "postgresql://";
const SQLITE_SCHEME: &str = "sqlite:";

/// Rewrite a leading `postgres://` (as handed out by most hosting platforms)
/// to `postgresql://`. Any other URL is returned unchanged.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix(LEGACY_POSTGRES_SCHEME) {
        Some(rest) => format!("{POSTGRES_SCHEME}{rest}"),
        None => url.to_string(),
    }
}

/// SQL engine behind a connection pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    /// Pick the backend from the URL scheme.
    pub fn from_url(url: &str) -> Result<Self, StorageError> {
        if url.starts_with(SQLITE_SCHEME) {
            Ok(Backend::Sqlite)
        } else if url.starts_with(POSTGRES_SCHEME) || url.starts_with(LEGACY_POSTGRES_SCHEME) {
            Ok(Backend::Postgres)
        } else {
            // Only the scheme goes into the error, the rest may carry credentials
            let scheme = url.split(':').next().unwrap_or_default();
            Err(StorageError::UnsupportedUrl(scheme.to_string()))
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Postgres => write!(f, "postgres"),
        }
    }
}
