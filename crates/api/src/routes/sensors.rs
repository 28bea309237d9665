//! Sensor Routes

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{ApiError, AppState};
use storage::SensorMeasurement;

/// All stored measurements
pub async fn get_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SensorMeasurement>>, ApiError> {
    let data = state.repository.list_all().await?;
    Ok(Json(data))
}

/// Measurements for one sensor, matched exactly on `sensor_name`.
/// The room segment is passed through as-is.
pub async fn get_by_room(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<Vec<SensorMeasurement>>, ApiError> {
    let data = state.repository.list_by_name(&room).await?;
    Ok(Json(data))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get, insert_full, insert_required, memory_app};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn parse(body: &str) -> Vec<Value> {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_empty_table_returns_empty_array() {
        let (app, _pool) = memory_app().await;
        let (status, body) = get(app, "/sensors").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_get_all_returns_one_record_per_row() {
        let (app, pool) = memory_app().await;
        insert_required(&pool, "kitchen", 21.5).await;
        insert_required(&pool, "bedroom", 18.0).await;
        insert_full(&pool, "office").await;

        let (status, body) = get(app, "/sensors").await;
        assert_eq!(status, StatusCode::OK);

        let mut names: Vec<String> = parse(&body)
            .iter()
            .map(|r| r["sensor_name"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["bedroom", "kitchen", "office"]);
    }

    #[tokio::test]
    async fn test_kitchen_example() {
        let (app, pool) = memory_app().await;
        insert_required(&pool, "kitchen", 21.50).await;

        let (status, body) = get(app, "/sensors/kitchen").await;
        assert_eq!(status, StatusCode::OK);

        let mut records = parse(&body);
        assert_eq!(records.len(), 1);

        let record = records[0].as_object_mut().unwrap();
        let timestamp = record.remove("timestamp").unwrap();
        let timestamp = timestamp.as_str().unwrap();
        assert_eq!(&timestamp[10..11], "T", "{timestamp}");

        assert_eq!(
            Value::Object(record.clone()),
            json!({
                "id": 1,
                "sensor_name": "kitchen",
                "temperature": 21.5,
                "humidity": 40,
                "calibrated_humidity": 42,
                "battery_voltage": null,
                "battery_percent": null,
                "rssi": null,
                "raspberry_pi_temperature": 35.1
            })
        );
    }

    #[tokio::test]
    async fn test_full_record() {
        let (app, pool) = memory_app().await;
        insert_full(&pool, "office").await;

        let (_, body) = get(app, "/sensors/office").await;
        assert_eq!(
            parse(&body),
            vec![json!({
                "id": 1,
                "sensor_name": "office",
                "temperature": 19.75,
                "humidity": 55,
                "calibrated_humidity": 53,
                "battery_voltage": 2.981,
                "battery_percent": 87,
                "rssi": -70,
                "timestamp": "2024-05-01T08:15:00",
                "raspberry_pi_temperature": 38.4
            })]
        );
    }

    #[tokio::test]
    async fn test_room_filter_is_exact() {
        let (app, pool) = memory_app().await;
        insert_required(&pool, "kitchen", 21.5).await;
        insert_required(&pool, "Kitchen", 20.0).await;
        insert_required(&pool, "kitchen annex", 19.0).await;
        insert_required(&pool, "kitchen", 22.5).await;

        let (status, body) = get(app, "/sensors/kitchen").await;
        assert_eq!(status, StatusCode::OK);

        let records = parse(&body);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r["sensor_name"] == "kitchen"));
    }

    #[tokio::test]
    async fn test_room_segment_is_percent_decoded() {
        let (app, pool) = memory_app().await;
        insert_required(&pool, "kitchen annex", 19.0).await;

        let (_, body) = get(app, "/sensors/kitchen%20annex").await;
        let records = parse(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["sensor_name"], "kitchen annex");
    }

    #[tokio::test]
    async fn test_unknown_room_returns_empty_array() {
        let (app, pool) = memory_app().await;
        insert_required(&pool, "kitchen", 21.5).await;

        let (status, body) = get(app, "/sensors/garage").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_storage_failure_is_server_error() {
        let (app, pool) = memory_app().await;
        pool.close().await;

        let (status, _) = get(app.clone(), "/sensors").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = get(app, "/sensors/kitchen").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
