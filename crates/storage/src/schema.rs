//! Table definition and queries for `sensor_measurements`

use sqlx::{PgPool, SqlitePool};
use tracing::info;

/// Name of the single table this service reads
pub const TABLE_NAME: &str = "sensor_measurements";

const SQLITE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS sensor_measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sensor_name VARCHAR(100) NOT NULL,
    temperature NUMERIC(5, 2) NOT NULL,
    humidity INTEGER NOT NULL,
    calibrated_humidity INTEGER NOT NULL,
    battery_voltage NUMERIC(4, 3),
    battery_percent INTEGER,
    rssi INTEGER,
    "timestamp" TIMESTAMP NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
    raspberry_pi_temperature NUMERIC(5, 2) NOT NULL
)
"#;

const POSTGRES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS sensor_measurements (
    id SERIAL PRIMARY KEY,
    sensor_name VARCHAR(100) NOT NULL,
    temperature NUMERIC(5, 2) NOT NULL,
    humidity INTEGER NOT NULL,
    calibrated_humidity INTEGER NOT NULL,
    battery_voltage NUMERIC(4, 3),
    battery_percent INTEGER,
    rssi INTEGER,
    "timestamp" TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'utc'),
    raspberry_pi_temperature NUMERIC(5, 2) NOT NULL
)
"#;

// Decimal columns are cast so both engines hand back a double, whatever the
// stored representation. NULL stays NULL through the cast. `id` is widened so
// a SQLite rowid past i32::MAX and a Postgres INT4 both decode as i64.
macro_rules! select_measurements {
    () => {
        r#"SELECT CAST(id AS BIGINT) AS id, sensor_name,
            CAST(temperature AS DOUBLE PRECISION) AS temperature,
            humidity, calibrated_humidity,
            CAST(battery_voltage AS DOUBLE PRECISION) AS battery_voltage,
            battery_percent, rssi, "timestamp",
            CAST(raspberry_pi_temperature AS DOUBLE PRECISION) AS raspberry_pi_temperature
        FROM sensor_measurements"#
    };
}

pub(crate) const SELECT_ALL: &str = select_measurements!();

pub(crate) const SELECT_BY_NAME: &str = concat!(select_measurements!(), " WHERE sensor_name = $1");

/// Create the table on SQLite if it does not exist yet
pub(crate) async fn create_sqlite(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(SQLITE_DDL).execute(pool).await?;
    info!("Table {} ready (sqlite)", TABLE_NAME);
    Ok(())
}

/// Create the table on PostgreSQL if it does not exist yet
pub(crate) async fn create_postgres(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(POSTGRES_DDL).execute(pool).await?;
    info!("Table {} ready (postgres)", TABLE_NAME);
    Ok(())
}
