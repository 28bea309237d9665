//! Measurement row model

use chrono::{NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};

/// One persisted sensor reading.
///
/// Serializes to the JSON record served by the API: decimals as floats,
/// absent optional columns as `null` and `timestamp` as an ISO-8601 string
/// without zone.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SensorMeasurement {
    pub id: i64,
    /// Originating sensor / room, many rows per name
    pub sensor_name: String,
    pub temperature: f64,
    /// Raw humidity percentage
    pub humidity: i32,
    pub calibrated_humidity: i32,
    /// Volts
    pub battery_voltage: Option<f64>,
    pub battery_percent: Option<i32>,
    pub rssi: Option<i32>,
    /// UTC wall clock
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub raspberry_pi_temperature: f64,
}

/// Render a timestamp as `YYYY-MM-DDTHH:MM:SS`, adding `.ffffff` only when
/// there is a sub-second part.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    if timestamp.nanosecond() / 1_000 == 0 {
        timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn serialize_timestamp<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(timestamp))
}
