//! Station identity and freshness windows.

use application::{ReportSchedule, WeatherServiceConfig};
use chrono::Duration;
use domain::{DomainError, Timezone};
use integration_weather::FeedFormat;
use serde::{Deserialize, Serialize};

use super::default_true;

/// Station identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// IANA timezone of record (default: Asia/Taipei)
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Data source name shown with readings; the feed format's own name when
    /// unset
    #[serde(default)]
    pub provider_name: Option<String>,
}

fn default_timezone() -> String {
    "Asia/Taipei".to_string()
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            provider_name: None,
        }
    }
}

impl StationConfig {
    /// Parsed timezone of record
    pub fn timezone(&self) -> Result<Timezone, DomainError> {
        Timezone::parse(&self.timezone)
    }

    /// Provider name to attach to readings from `format`
    #[must_use]
    pub fn provider_name(&self, format: FeedFormat) -> String {
        self.provider_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format.default_provider_name())
            .to_string()
    }
}

/// How old a stored reading may be before the feed is asked again
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshnessConfig {
    /// Window for the page view (default: 900)
    #[serde(default = "default_page_max_age")]
    pub page_max_age_secs: u64,

    /// Window for the JSON API and CLI (default: 300)
    #[serde(default = "default_api_max_age")]
    pub api_max_age_secs: u64,

    /// How far before a report slot a reading may lie (default: 1800)
    #[serde(default = "default_report_tolerance")]
    pub report_tolerance_secs: u64,

    /// Let concurrent misses share one feed fetch (default: true)
    #[serde(default = "default_true")]
    pub coalesce_fetches: bool,
}

const fn default_page_max_age() -> u64 {
    900
}

const fn default_api_max_age() -> u64 {
    300
}

const fn default_report_tolerance() -> u64 {
    1800
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            page_max_age_secs: default_page_max_age(),
            api_max_age_secs: default_api_max_age(),
            report_tolerance_secs: default_report_tolerance(),
            coalesce_fetches: true,
        }
    }
}

/// Seconds as a chrono duration, saturating
pub(crate) fn seconds(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

impl FreshnessConfig {
    #[must_use]
    pub fn page_max_age(&self) -> Duration {
        seconds(self.page_max_age_secs)
    }

    #[must_use]
    pub fn api_max_age(&self) -> Duration {
        seconds(self.api_max_age_secs)
    }

    #[must_use]
    pub fn report_tolerance(&self) -> Duration {
        seconds(self.report_tolerance_secs)
    }

    /// Application service settings for the given station timezone
    #[must_use]
    pub fn service_config(&self, timezone: Timezone) -> WeatherServiceConfig {
        WeatherServiceConfig {
            timezone,
            report: ReportSchedule {
                tolerance: self.report_tolerance(),
                ..ReportSchedule::default()
            },
            coalesce_fetches: self.coalesce_fetches,
        }
    }
}
