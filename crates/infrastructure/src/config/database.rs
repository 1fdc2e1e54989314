//! Database (SQLite) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;
use crate::persistence::AsyncDatabaseConfig;

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL (e.g. `sqlite:weather.db`)
    #[serde(default = "default_db_url")]
    pub url: String,

    /// Maximum number of concurrent database connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Whether to run pending migrations on startup (default: true)
    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// Enable write-ahead logging for file databases (default: true)
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// Milliseconds a writer waits on a locked database
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_db_url() -> String {
    "sqlite:weather.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
            run_migrations: true,
            wal_mode: true,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the URL names an in-memory SQLite database
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Pool settings for [`crate::persistence::AsyncDatabase`]
    ///
    /// In-memory databases are pinned to a single connection, since every
    /// pooled connection would otherwise open its own empty database.
    #[must_use]
    pub fn to_async_config(&self) -> AsyncDatabaseConfig {
        if self.is_in_memory() {
            return AsyncDatabaseConfig {
                url: self.url.clone(),
                busy_timeout: Duration::from_millis(self.busy_timeout_ms),
                ..AsyncDatabaseConfig::in_memory()
            };
        }

        AsyncDatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            wal_mode: self.wal_mode,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            ..AsyncDatabaseConfig::default()
        }
    }
}
