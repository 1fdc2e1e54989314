//! Relay API parser

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use domain::{Measurements, Timezone, WindDirection};
use tracing::debug;

use super::{observation, FeedParser};
use crate::{
    client::FeedError,
    models::{Observation, RelayPayload, Scalar},
};

/// Naive ISO 8601 layouts the relay has been seen to emit
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parser for the student-association relay JSON
#[derive(Debug, Clone, Copy)]
pub struct RelayJsonParser {
    timezone: Timezone,
}

impl RelayJsonParser {
    /// Dates without an offset are interpreted in `timezone`
    #[must_use]
    pub const fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }

    fn parse_date(&self, date: &str) -> Option<DateTime<FixedOffset>> {
        let date = date.trim();
        if let Ok(aware) = DateTime::parse_from_rfc3339(date) {
            return Some(aware);
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(date, format).ok())
            .and_then(|naive| self.timezone.localize(naive).ok())
    }
}

impl FeedParser for RelayJsonParser {
    fn parse(&self, raw: &str) -> Result<Observation, FeedError> {
        if raw.trim().is_empty() {
            return Err(FeedError::parse("empty response body", raw));
        }

        let payload: RelayPayload = serde_json::from_str(raw)
            .map_err(|e| FeedError::parse(format!("invalid relay payload: {e}"), raw))?;

        let float = |name: &str, value: &Scalar| {
            value
                .as_f64()
                .ok_or_else(|| FeedError::parse(format!("invalid {name}: {value:?}"), raw))
        };

        let observed_at = self
            .parse_date(&payload.date)
            .ok_or_else(|| FeedError::parse(format!("invalid date: {}", payload.date), raw))?;

        let wind_direction = payload.wind_direction.as_degrees().ok_or_else(|| {
            FeedError::parse(
                format!("invalid wind_direction: {:?}", payload.wind_direction),
                raw,
            )
        })?;

        let measurements = Measurements {
            temperature: float("temperature", &payload.temperature)?,
            pressure: float("pressure", &payload.pressure)?,
            humidity: float("humidity", &payload.humidity)?,
            wind_speed: float("wind_speed", &payload.wind_speed)?,
            wind_direction: WindDirection::new(wind_direction),
            rain_per_hour: float("rain", &payload.rain)?,
            rain_per_minute: float("rain_minute", &payload.rain_minute)?,
            ground_temperature: float("temp_ground", &payload.temp_ground)?,
        };

        debug!(observed_at = %observed_at, "Parsed relay payload");
        observation(observed_at, measurements, payload.provider, raw)
    }
}
