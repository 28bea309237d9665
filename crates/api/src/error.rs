//! Handler error type

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Errors a request handler can end with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
