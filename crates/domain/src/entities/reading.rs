//! Reading entity - One weather observation from the station

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;
use crate::value_objects::{Timezone, WindDirection};

/// The physical quantities reported by the station
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    /// Air temperature in °C
    pub temperature: f64,
    /// Sea-level pressure in hPa
    pub pressure: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Ten-minute average wind speed in m/s
    pub wind_speed: f64,
    /// Ten-minute average wind direction
    pub wind_direction: WindDirection,
    /// Accumulated rain over the last hour in mm
    pub rain_per_hour: f64,
    /// Rain over the last minute in mm
    pub rain_per_minute: f64,
    /// Ground (0 cm) temperature in °C
    pub ground_temperature: f64,
}

impl Measurements {
    /// Check that every quantity is finite and rain amounts are non-negative
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReading` naming the first offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let scalars = [
            ("temperature", self.temperature),
            ("pressure", self.pressure),
            ("humidity", self.humidity),
            ("wind_speed", self.wind_speed),
            ("rain_per_hour", self.rain_per_hour),
            ("rain_per_minute", self.rain_per_minute),
            ("ground_temperature", self.ground_temperature),
        ];

        if let Some((name, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DomainError::InvalidReading(format!(
                "{name} is not a finite number: {value}"
            )));
        }

        for (name, value) in [
            ("rain_per_hour", self.rain_per_hour),
            ("rain_per_minute", self.rain_per_minute),
        ] {
            if value < 0.0 {
                return Err(DomainError::InvalidReading(format!(
                    "{name} must not be negative: {value}"
                )));
            }
        }

        Ok(())
    }
}

/// A weather observation at a point in time
///
/// Real readings are always `valid`. A placeholder (`valid == false`) stands
/// in for a report slot with no nearby observation; placeholders are never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// When the station observed the values
    pub observed_at: DateTime<FixedOffset>,
    /// Observed quantities
    #[serde(flatten)]
    pub measurements: Measurements,
    /// Data source name, attached at read time
    pub provider_name: String,
    /// `false` for placeholders
    pub valid: bool,
}

impl Reading {
    /// Create a validated reading
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReading` if the measurements fail
    /// validation.
    pub fn new(
        observed_at: DateTime<FixedOffset>,
        measurements: Measurements,
    ) -> Result<Self, DomainError> {
        measurements.validate()?;
        Ok(Self {
            observed_at,
            measurements,
            provider_name: String::new(),
            valid: true,
        })
    }

    /// Create a "no data" stand-in for a report slot
    #[must_use]
    pub fn placeholder(slot: DateTime<FixedOffset>) -> Self {
        Self {
            observed_at: slot,
            measurements: Measurements::default(),
            provider_name: String::new(),
            valid: false,
        }
    }

    /// Attach the data source name
    #[must_use]
    pub fn with_provider(mut self, provider_name: impl Into<String>) -> Self {
        self.provider_name = provider_name.into();
        self
    }

    /// Express the observation time in the given timezone
    #[must_use]
    pub fn in_timezone(mut self, timezone: &Timezone) -> Self {
        self.observed_at = timezone.normalize(&self.observed_at);
        self
    }

    /// Check whether this is a real observation
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Age of the observation relative to `reference`
    #[must_use]
    pub fn age_at(&self, reference: DateTime<Utc>) -> Duration {
        reference.signed_duration_since(self.observed_at)
    }

    /// Freshness decision: strictly younger than `max_age` at `reference`
    #[must_use]
    pub fn is_fresh_at(&self, reference: DateTime<Utc>, max_age: Duration) -> bool {
        self.age_at(reference) < max_age
    }

    /// Compare the persisted parts of two readings
    ///
    /// Ignores the provider name and the timezone the timestamp is expressed in.
    #[must_use]
    pub fn same_observation(&self, other: &Self) -> bool {
        self.observed_at == other.observed_at && self.measurements == other.measurements
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return write!(f, "{} (no data)", self.observed_at.format("%Y-%m-%d %H:%M"));
        }
        write!(
            f,
            "{} {}°C",
            self.observed_at.format("%Y-%m-%d %H:%M"),
            self.measurements.temperature
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_measurements() -> Measurements {
        Measurements {
            temperature: 23.4,
            pressure: 1012.8,
            humidity: 78.0,
            wind_speed: 2.1,
            wind_direction: WindDirection::new(135),
            rain_per_hour: 0.5,
            rain_per_minute: 0.0,
            ground_temperature: 25.1,
        }
    }

    fn observed_at() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2020, 5, 1, 14, 30, 0)
            .unwrap()
    }

    #[test]
    fn new_reading_is_valid() {
        let reading = Reading::new(observed_at(), sample_measurements()).unwrap();
        assert!(reading.is_valid());
        assert!(reading.provider_name.is_empty());
    }

    #[test]
    fn negative_rain_is_rejected() {
        let mut m = sample_measurements();
        m.rain_per_minute = -0.1;
        let err = Reading::new(observed_at(), m).unwrap_err();
        assert!(err.to_string().contains("rain_per_minute"));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut m = sample_measurements();
        m.pressure = f64::NAN;
        assert!(Reading::new(observed_at(), m).is_err());

        let mut m = sample_measurements();
        m.temperature = f64::INFINITY;
        assert!(Reading::new(observed_at(), m).is_err());
    }

    #[test]
    fn negative_temperature_is_allowed() {
        let mut m = sample_measurements();
        m.temperature = -3.5;
        m.ground_temperature = -1.0;
        assert!(Reading::new(observed_at(), m).is_ok());
    }

    #[test]
    fn placeholder_is_invalid() {
        let placeholder = Reading::placeholder(observed_at());
        assert!(!placeholder.is_valid());
        assert_eq!(placeholder.observed_at, observed_at());
        assert!(placeholder.to_string().contains("no data"));
    }

    #[test]
    fn freshness_is_strict() {
        let reading = Reading::new(observed_at(), sample_measurements()).unwrap();
        let max_age = Duration::seconds(300);

        let just_inside = observed_at().with_timezone(&Utc) + Duration::seconds(299);
        let boundary = observed_at().with_timezone(&Utc) + Duration::seconds(300);

        assert!(reading.is_fresh_at(just_inside, max_age));
        assert!(!reading.is_fresh_at(boundary, max_age));
        assert_eq!(reading.age_at(boundary), max_age);
    }

    #[test]
    fn in_timezone_keeps_instant() {
        let reading = Reading::new(observed_at(), sample_measurements()).unwrap();
        let utc = reading.clone().in_timezone(&Timezone::utc());
        assert_eq!(utc.observed_at.offset().local_minus_utc(), 0);
        assert!(utc.same_observation(&reading));
    }

    #[test]
    fn same_observation_ignores_provider() {
        let a = Reading::new(observed_at(), sample_measurements()).unwrap();
        let b = a.clone().with_provider("station");
        assert_ne!(a, b);
        assert!(a.same_observation(&b));
    }

    #[test]
    fn serialization_flattens_measurements() {
        let reading = Reading::new(observed_at(), sample_measurements())
            .unwrap()
            .with_provider("station");
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["temperature"], 23.4);
        assert_eq!(json["wind_direction"], 135);
        assert_eq!(json["observed_at"], "2020-05-01T14:30:00+08:00");

        let back: Reading = serde_json::from_value(json).unwrap();
        assert_eq!(back, reading);
    }
}
