//! Upstream payload parsers
//!
//! Each supported feed format has one parser turning the raw response text
//! into an [`Observation`]. The format is chosen by configuration.

mod relay_json;
mod station_html;

use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset};
use domain::{Measurements, Timezone};
use serde::{Deserialize, Serialize};

pub use relay_json::RelayJsonParser;
pub use station_html::StationHtmlParser;

use crate::{client::FeedError, models::Observation};

/// Parses one raw feed response
///
/// Parsing is all-or-nothing: any missing or malformed field fails the whole
/// response with `FeedError::Parse` carrying the raw text.
pub trait FeedParser: Send + Sync + fmt::Debug {
    fn parse(&self, raw: &str) -> Result<Observation, FeedError>;
}

/// Supported upstream formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedFormat {
    /// Atmospheric-science department station page (HTML)
    #[default]
    NtuAs,
    /// Student-association relay API (JSON)
    NtusaRelay,
}

impl FeedFormat {
    /// Configuration key of this format
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NtuAs => "ntu_as",
            Self::NtusaRelay => "ntusa_relay",
        }
    }

    /// Endpoint used when none is configured
    #[must_use]
    pub const fn default_url(&self) -> &'static str {
        match self {
            Self::NtuAs => "http://140.112.67.180/data.php",
            Self::NtusaRelay => "http://weather.ntustudents.org/api",
        }
    }

    /// Data source name used when none is configured
    #[must_use]
    pub const fn default_provider_name(&self) -> &'static str {
        match self {
            Self::NtuAs => "國立臺灣大學中尺度暨地形降水研究室",
            Self::NtusaRelay => "第28屆臺大學生會福利部",
        }
    }

    /// Build the parser for this format
    ///
    /// Naive timestamps in the payload are interpreted in `timezone`.
    #[must_use]
    pub fn parser(&self, timezone: Timezone) -> Box<dyn FeedParser> {
        match self {
            Self::NtuAs => Box::new(StationHtmlParser::new(timezone)),
            Self::NtusaRelay => Box::new(RelayJsonParser::new(timezone)),
        }
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ntu_as" => Ok(Self::NtuAs),
            "ntusa_relay" => Ok(Self::NtusaRelay),
            other => Err(format!("unknown feed format: {other}")),
        }
    }
}

/// Validate measurements and assemble the observation
fn observation(
    observed_at: DateTime<FixedOffset>,
    measurements: Measurements,
    provider: Option<String>,
    raw: &str,
) -> Result<Observation, FeedError> {
    measurements
        .validate()
        .map_err(|e| FeedError::parse(e.to_string(), raw))?;
    Ok(Observation {
        observed_at,
        measurements,
        provider,
    })
}
