//! Service wiring
//!
//! Builds the `WeatherService` from configuration: database pool and
//! migrations, the SQLite store, and the feed adapter for the configured
//! format.

use std::sync::Arc;

use application::{WeatherService, ports::WeatherFeedPort};
use domain::DomainError;
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    adapters::WeatherFeedAdapter,
    config::AppConfig,
    persistence::{AsyncDatabase, AsyncDatabaseError, SqliteReadingStore},
};

/// Errors while assembling the service
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error("Invalid timezone: {0}")]
    Timezone(#[from] DomainError),

    #[error(transparent)]
    Database(#[from] AsyncDatabaseError),

    #[error("Feed client setup failed: {0}")]
    Feed(String),
}

/// A wired service plus the pool it owns
#[derive(Debug, Clone)]
pub struct WeatherRuntime {
    pub service: Arc<WeatherService>,
    pub database: AsyncDatabase,
}

/// Build the service with the feed adapter described by `config`
#[instrument(skip_all, fields(format = %config.feed.format, db = %config.database.url))]
pub async fn build_runtime(config: &AppConfig) -> Result<WeatherRuntime, BootstrapError> {
    let timezone = config.station.timezone()?;
    let feed = WeatherFeedAdapter::new(config.feed.clone(), timezone, config.provider_name())
        .map_err(|e| BootstrapError::Feed(e.to_string()))?;
    build_runtime_with_feed(config, Arc::new(feed)).await
}

/// Build the service around an already constructed feed port
pub async fn build_runtime_with_feed(
    config: &AppConfig,
    feed: Arc<dyn WeatherFeedPort>,
) -> Result<WeatherRuntime, BootstrapError> {
    let problems = config.validate();
    if !problems.is_empty() {
        return Err(BootstrapError::InvalidConfig(problems));
    }
    let timezone = config.station.timezone()?;

    let database = AsyncDatabase::new(&config.database.to_async_config()).await?;
    if config.database.run_migrations {
        database.migrate().await?;
    }

    let store = Arc::new(SqliteReadingStore::new(database.pool().clone()));
    let service = WeatherService::new(store, feed, config.freshness.service_config(timezone));

    info!(
        timezone = %timezone,
        endpoint = %config.feed.endpoint(),
        coalesce_fetches = config.freshness.coalesce_fetches,
        "Weather service ready"
    );

    Ok(WeatherRuntime {
        service: Arc::new(service),
        database,
    })
}
