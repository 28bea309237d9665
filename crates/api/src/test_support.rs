//! Shared helpers for router tests

use crate::{config::HttpConfig, create_router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use storage::Repository;
use tower::ServiceExt;

/// Router over a fresh in-memory database with the table already created
pub async fn memory_app() -> (Router, SqlitePool) {
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let repository = Repository::from_sqlite_pool(pool.clone());
    repository.init_schema().await.unwrap();

    let app = create_router(Arc::new(AppState::new(repository)), &HttpConfig::default()).unwrap();
    (app, pool)
}

/// Insert a row with only the required columns set
pub async fn insert_required(pool: &SqlitePool, name: &str, temperature: f64) {
    sqlx::query(
        "INSERT INTO sensor_measurements \
         (sensor_name, temperature, humidity, calibrated_humidity, raspberry_pi_temperature) \
         VALUES ($1, $2, 40, 42, 35.10)",
    )
    .bind(name)
    .bind(temperature)
    .execute(pool)
    .await
    .unwrap();
}

/// Insert a row with every column set
pub async fn insert_full(pool: &SqlitePool, name: &str) {
    sqlx::query(
        "INSERT INTO sensor_measurements \
         (sensor_name, temperature, humidity, calibrated_humidity, battery_voltage, \
          battery_percent, rssi, \"timestamp\", raspberry_pi_temperature) \
         VALUES ($1, 19.75, 55, 53, 2.981, 87, -70, '2024-05-01 08:15:00', 38.4)",
    )
    .bind(name)
    .execute(pool)
    .await
    .unwrap();
}

/// Issue a GET and return status plus body text
pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
