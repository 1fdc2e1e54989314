//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports: the SQLite reading store and the
//! station feed adapter. Also owns configuration loading, logging setup and
//! service wiring.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::{BootstrapError, WeatherRuntime, build_runtime, build_runtime_with_feed};
pub use config::{
    AppConfig, DatabaseConfig, FreshnessConfig, LoggingConfig, ServerConfig, StationConfig,
};
pub use persistence::{AsyncDatabase, AsyncDatabaseConfig, SqliteReadingStore};
pub use telemetry::{TelemetryError, init_logging};
