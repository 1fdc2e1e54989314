//! SQLite-based reading persistence using sqlx
//!
//! Readings are appended in a transaction and queried by observation time.
//! Timestamps are stored as UTC text with fixed microsecond precision, so the
//! `observed_at` index serves both the latest-before lookup and range scans.

use application::{
    error::ApplicationError,
    ports::{ReadingStorePort, TemperatureExtremes},
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use domain::{Measurements, Reading, WindDirection};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::map_sqlx_error;

/// Async reading store using sqlx
#[derive(Debug, Clone)]
pub struct SqliteReadingStore {
    pool: SqlitePool,
}

impl SqliteReadingStore {
    /// Create a new reading store over a migrated pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Storage form of a timestamp
fn timestamp_key<Tz: chrono::TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl ReadingStorePort for SqliteReadingStore {
    #[instrument(skip(self, reading), fields(observed_at = %reading.observed_at))]
    async fn append(&self, reading: &Reading) -> Result<(), ApplicationError> {
        if !reading.is_valid() {
            return Err(ApplicationError::Storage(
                "Refusing to store a placeholder reading".to_string(),
            ));
        }

        let m = &reading.measurements;
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r"
            INSERT INTO readings (
                observed_at, temperature, pressure, humidity, wind_speed,
                wind_direction, rain_per_hour, rain_per_minute, ground_temperature
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(timestamp_key(&reading.observed_at))
        .bind(m.temperature)
        .bind(m.pressure)
        .bind(m.humidity)
        .bind(m.wind_speed)
        .bind(i64::from(m.wind_direction.degrees()))
        .bind(m.rain_per_hour)
        .bind(m.rain_per_minute)
        .bind(m.ground_temperature)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!("Reading stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn latest_at_or_before(
        &self,
        at: DateTime<Utc>,
    ) -> Result<Option<Reading>, ApplicationError> {
        let row: Option<ReadingRow> = sqlx::query_as(
            r"
            SELECT observed_at, temperature, pressure, humidity, wind_speed,
                   wind_direction, rain_per_hour, rain_per_minute, ground_temperature
            FROM readings
            WHERE observed_at <= $1
            ORDER BY observed_at DESC, id DESC
            LIMIT 1
            ",
        )
        .bind(timestamp_key(&at))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(ReadingRow::into_reading).transpose()
    }

    #[instrument(skip(self))]
    async fn extremes_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<TemperatureExtremes, ApplicationError> {
        let (max, min): (Option<f64>, Option<f64>) = sqlx::query_as(
            "SELECT MAX(temperature), MIN(temperature) FROM readings WHERE observed_at >= $1",
        )
        .bind(timestamp_key(&since))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(TemperatureExtremes { max, min })
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, ApplicationError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM readings")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        u64::try_from(count).map_err(|e| ApplicationError::Storage(e.to_string()))
    }
}

/// Row type for reading queries
#[derive(sqlx::FromRow)]
struct ReadingRow {
    observed_at: String,
    temperature: f64,
    pressure: f64,
    humidity: f64,
    wind_speed: f64,
    wind_direction: i64,
    rain_per_hour: f64,
    rain_per_minute: f64,
    ground_temperature: f64,
}

impl ReadingRow {
    fn into_reading(self) -> Result<Reading, ApplicationError> {
        let observed_at = DateTime::parse_from_rfc3339(&self.observed_at)
            .map_err(|e| ApplicationError::Storage(format!("Invalid datetime: {e}")))?;
        let wind_direction = u16::try_from(self.wind_direction).map_err(|_| {
            ApplicationError::Storage(format!("Invalid wind direction: {}", self.wind_direction))
        })?;

        let measurements = Measurements {
            temperature: self.temperature,
            pressure: self.pressure,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            wind_direction: WindDirection::new(wind_direction),
            rain_per_hour: self.rain_per_hour,
            rain_per_minute: self.rain_per_minute,
            ground_temperature: self.ground_temperature,
        };
        Ok(Reading::new(observed_at, measurements)?)
    }
}
