//! Feed data models
//!
//! `Observation` is what every parser produces. The relay payload types
//! mirror the JSON the student-association relay serves.

use chrono::{DateTime, FixedOffset};
use domain::{DomainError, Measurements, Reading};
use serde::Deserialize;

/// One parsed observation, before it becomes a domain `Reading`
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Observation time, offset-aware
    pub observed_at: DateTime<FixedOffset>,
    /// The eight scalar fields
    pub measurements: Measurements,
    /// Data source name reported by the payload itself, if any
    pub provider: Option<String>,
}

impl Observation {
    /// Convert into a domain reading
    ///
    /// The payload's own provider name wins over `default_provider` unless it
    /// is blank.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReading` if the measurements fail
    /// validation.
    pub fn into_reading(self, default_provider: &str) -> Result<Reading, DomainError> {
        let provider = self
            .provider
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| default_provider.to_string());
        Ok(Reading::new(self.observed_at, self.measurements)?.with_provider(provider))
    }
}

/// Relay API response body
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RelayPayload {
    pub date: String,
    pub temperature: Scalar,
    pub pressure: Scalar,
    pub humidity: Scalar,
    pub wind_speed: Scalar,
    pub wind_direction: Scalar,
    pub rain: Scalar,
    pub rain_minute: Scalar,
    pub temp_ground: Scalar,
    #[serde(default)]
    pub provider: Option<String>,
}

/// A number the relay may send either as a JSON number or as text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Finite floating point value
    pub(crate) fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Whole degrees; text must be an integer literal
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Range checked
    pub(crate) fn as_degrees(&self) -> Option<u16> {
        match self {
            Self::Number(n) if n.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(n) => {
                Some(*n as u16)
            },
            Self::Number(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use domain::WindDirection;

    use super::*;

    fn observation(provider: Option<&str>) -> Observation {
        Observation {
            observed_at: FixedOffset::east_opt(8 * 3600)
                .unwrap()
                .with_ymd_and_hms(2020, 6, 1, 14, 30, 0)
                .unwrap(),
            measurements: Measurements {
                temperature: 31.2,
                pressure: 1008.1,
                humidity: 66.0,
                wind_speed: 2.4,
                wind_direction: WindDirection::new(135),
                rain_per_hour: 0.0,
                rain_per_minute: 0.0,
                ground_temperature: 35.0,
            },
            provider: provider.map(str::to_string),
        }
    }

    #[test]
    fn payload_provider_overrides_default() {
        let reading = observation(Some("Relay"))
            .into_reading("Configured")
            .unwrap();
        assert_eq!(reading.provider_name, "Relay");
        assert!(reading.is_valid());
    }

    #[test]
    fn blank_provider_falls_back_to_default() {
        let reading = observation(Some("  ")).into_reading("Configured").unwrap();
        assert_eq!(reading.provider_name, "Configured");

        let reading = observation(None).into_reading("Configured").unwrap();
        assert_eq!(reading.provider_name, "Configured");
    }

    #[test]
    fn invalid_measurements_are_rejected() {
        let mut obs = observation(None);
        obs.measurements.rain_per_hour = -1.0;
        assert!(obs.into_reading("x").is_err());
    }

    #[test]
    fn scalar_accepts_numbers_and_numeric_text() {
        let number: Scalar = serde_json::from_str("27.5").unwrap();
        let text: Scalar = serde_json::from_str(r#"" 27.5 ""#).unwrap();
        assert_eq!(number.as_f64(), Some(27.5));
        assert_eq!(text.as_f64(), Some(27.5));
        assert_eq!(Scalar::Text("n/a".into()).as_f64(), None);
        assert_eq!(Scalar::Text("NaN".into()).as_f64(), None);
    }

    #[test]
    fn degrees_must_be_whole() {
        assert_eq!(Scalar::Number(225.0).as_degrees(), Some(225));
        assert_eq!(Scalar::Text("225".into()).as_degrees(), Some(225));
        assert_eq!(Scalar::Number(225.5).as_degrees(), None);
        assert_eq!(Scalar::Text("225.0".into()).as_degrees(), None);
        assert_eq!(Scalar::Number(-5.0).as_degrees(), None);
    }
}
