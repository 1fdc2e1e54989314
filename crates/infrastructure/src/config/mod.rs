//! Application configuration
//!
//! Split into focused sub-modules:
//! - `station`: timezone of record, provider name, freshness windows
//! - `database`: SQLite database settings
//! - `server`: HTTP server settings
//! - `logging`: log filter and output format
//!
//! The feed section reuses [`integration_weather::FeedConfig`] directly.

mod database;
mod logging;
mod server;
mod station;

use std::path::Path;

use integration_weather::FeedConfig;
use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use logging::LoggingConfig;
pub use server::ServerConfig;
pub use station::{FreshnessConfig, StationConfig};

/// Prefix of environment variable overrides, e.g. `WEATHER_DATABASE__URL`
pub const ENV_PREFIX: &str = "WEATHER";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Station identity
    #[serde(default)]
    pub station: StationConfig,

    /// Upstream feed
    #[serde(default)]
    pub feed: FeedConfig,

    /// Freshness windows
    #[serde(default)]
    pub freshness: FreshnessConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (or `config.toml` when
    /// `None`) and environment
    ///
    /// Sources are layered: built-in defaults, then the file, then
    /// `WEATHER_*` environment variables with `__` between nested keys.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Check the configuration for values that would break at runtime
    ///
    /// Returns one message per problem; an empty list means the
    /// configuration is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Err(e) = self.station.timezone() {
            problems.push(format!("station.timezone: {e}"));
        }
        if self.feed.url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            problems.push("feed.url: must not be empty when set".to_string());
        }
        if self.feed.timeout_secs == 0 {
            problems.push("feed.timeout_secs: must be greater than zero".to_string());
        }
        for (key, value) in [
            ("freshness.page_max_age_secs", self.freshness.page_max_age_secs),
            ("freshness.api_max_age_secs", self.freshness.api_max_age_secs),
            (
                "freshness.report_tolerance_secs",
                self.freshness.report_tolerance_secs,
            ),
        ] {
            if value == 0 {
                problems.push(format!("{key}: must be greater than zero"));
            }
        }
        if self.database.max_connections == 0 {
            problems.push("database.max_connections: must be at least 1".to_string());
        }

        problems
    }

    /// Provider name for readings from the configured feed
    #[must_use]
    pub fn provider_name(&self) -> String {
        self.station.provider_name(self.feed.format)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use integration_weather::FeedFormat;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
    }

    #[test]
    fn default_values() {
        let config = AppConfig::default();
        assert_eq!(config.station.timezone, "Asia/Taipei");
        assert_eq!(config.freshness.page_max_age_secs, 900);
        assert_eq!(config.freshness.api_max_age_secs, 300);
        assert_eq!(config.freshness.report_tolerance_secs, 1800);
        assert!(config.freshness.coalesce_fetches);
        assert_eq!(config.database.url, "sqlite:weather.db");
        assert!(config.database.run_migrations);
        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut config = AppConfig::default();
        config.station.timezone = "Mars/Olympus".to_string();
        config.feed.url = Some("   ".to_string());
        config.freshness.api_max_age_secs = 0;
        config.database.max_connections = 0;

        let problems = config.validate();

        assert_eq!(problems.len(), 4, "{problems:?}");
        assert!(problems.iter().any(|p| p.starts_with("station.timezone")));
        assert!(problems.iter().any(|p| p.starts_with("feed.url")));
        assert!(problems.iter().any(|p| p.starts_with("freshness.api_max_age_secs")));
        assert!(problems.iter().any(|p| p.starts_with("database.max_connections")));
    }

    #[test]
    fn provider_name_follows_feed_format() {
        let mut config = AppConfig::default();
        assert_eq!(config.provider_name(), FeedFormat::NtuAs.default_provider_name());

        config.feed.format = FeedFormat::NtusaRelay;
        assert_eq!(
            config.provider_name(),
            FeedFormat::NtusaRelay.default_provider_name()
        );

        config.station.provider_name = Some("Rooftop".to_string());
        assert_eq!(config.provider_name(), "Rooftop");
    }

    #[test]
    fn load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[station]
timezone = "UTC"

[feed]
format = "ntusa_relay"
url = "http://localhost:8080/api"

[freshness]
api_max_age_secs = 60
coalesce_fetches = false

[database]
url = "sqlite::memory:"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(Some(file.path())).unwrap();

        assert_eq!(config.station.timezone, "UTC");
        assert_eq!(config.feed.format, FeedFormat::NtusaRelay);
        assert_eq!(config.feed.endpoint(), "http://localhost:8080/api");
        assert_eq!(config.freshness.api_max_age_secs, 60);
        assert_eq!(config.freshness.page_max_age_secs, 900);
        assert!(!config.freshness.coalesce_fetches);
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let result = AppConfig::load_from(Some(Path::new("/nonexistent/weather.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn freshness_durations() {
        let freshness = FreshnessConfig::default();
        assert_eq!(freshness.page_max_age(), chrono::Duration::minutes(15));
        assert_eq!(freshness.api_max_age(), chrono::Duration::minutes(5));
        assert_eq!(freshness.report_tolerance(), chrono::Duration::minutes(30));
    }

    #[test]
    fn service_config_carries_tolerance() {
        let freshness = FreshnessConfig {
            report_tolerance_secs: 600,
            coalesce_fetches: false,
            ..FreshnessConfig::default()
        };
        let service = freshness.service_config(domain::Timezone::utc());

        assert_eq!(service.report.tolerance, chrono::Duration::minutes(10));
        assert_eq!(service.report.slots, 8);
        assert!(!service.coalesce_fetches);
    }

    #[test]
    fn database_config_maps_to_pool_settings() {
        let database = DatabaseConfig {
            busy_timeout_ms: 250,
            wal_mode: false,
            ..DatabaseConfig::default()
        };
        let pool = database.to_async_config();
        assert_eq!(pool.busy_timeout, std::time::Duration::from_millis(250));
        assert!(!pool.wal_mode);
        assert_eq!(pool.url, "sqlite:weather.db");
    }
}
