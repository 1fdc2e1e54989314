//! Weather service
//!
//! Facade the presentation layers talk to: current conditions, the daily
//! report and today's temperature extremes.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use domain::{Reading, Timezone};
use tracing::instrument;

use super::{DailyAggregator, FreshnessCache, ReportSchedule};
use crate::{
    error::ApplicationError,
    ports::{ReadingStorePort, TemperatureExtremes, WeatherFeedPort},
};

/// Weather service configuration
#[derive(Debug, Clone, Default)]
pub struct WeatherServiceConfig {
    /// Timezone readings are presented in and "today" is computed in
    pub timezone: Timezone,
    /// Daily report layout
    pub report: ReportSchedule,
    /// Share one feed fetch between concurrent cache misses
    pub coalesce_fetches: bool,
}

/// Application facade over the freshness cache and daily aggregator
#[derive(Clone)]
pub struct WeatherService {
    cache: Arc<FreshnessCache>,
    aggregator: DailyAggregator,
    store: Arc<dyn ReadingStorePort>,
    timezone: Timezone,
}

impl fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherService")
            .field("cache", &self.cache)
            .field("schedule", self.aggregator.schedule())
            .finish_non_exhaustive()
    }
}

impl WeatherService {
    pub fn new(
        store: Arc<dyn ReadingStorePort>,
        feed: Arc<dyn WeatherFeedPort>,
        config: WeatherServiceConfig,
    ) -> Self {
        let cache = Arc::new(
            FreshnessCache::new(Arc::clone(&store), feed, config.timezone)
                .with_fetch_coalescing(config.coalesce_fetches),
        );
        let aggregator = DailyAggregator::new(Arc::clone(&cache), config.report);
        Self {
            cache,
            aggregator,
            store,
            timezone: config.timezone,
        }
    }

    /// Current conditions, at most `max_age` old
    pub async fn current(&self, max_age: Duration) -> Result<Reading, ApplicationError> {
        self.current_at(max_age, Utc::now()).await
    }

    /// Current conditions relative to an explicit reference time
    pub async fn current_at(
        &self,
        max_age: Duration,
        reference: DateTime<Utc>,
    ) -> Result<Reading, ApplicationError> {
        self.cache.get_or_fetch(max_age, reference).await
    }

    /// Daily report ending now, oldest first
    pub async fn daily_report(&self) -> Result<Vec<Reading>, ApplicationError> {
        self.daily_report_at(Utc::now()).await
    }

    pub async fn daily_report_at(
        &self,
        reference: DateTime<Utc>,
    ) -> Result<Vec<Reading>, ApplicationError> {
        self.aggregator.report_at(reference).await
    }

    /// Temperature extremes of readings observed at or after `since`
    #[instrument(skip(self))]
    pub async fn extremes(
        &self,
        since: DateTime<Utc>,
    ) -> Result<TemperatureExtremes, ApplicationError> {
        self.store.extremes_since(since).await
    }

    /// Temperature extremes since local midnight
    pub async fn extremes_today(&self) -> Result<TemperatureExtremes, ApplicationError> {
        self.extremes_for_day_of(Utc::now()).await
    }

    /// Temperature extremes since the local midnight preceding `reference`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if midnight does not exist in the
    /// configured timezone on that day.
    pub async fn extremes_for_day_of(
        &self,
        reference: DateTime<Utc>,
    ) -> Result<TemperatureExtremes, ApplicationError> {
        let midnight = self.timezone.start_of_day(&reference)?;
        self.extremes(midnight.with_timezone(&Utc)).await
    }

    /// Number of stored readings
    pub async fn stored_readings(&self) -> Result<u64, ApplicationError> {
        self.store.count().await
    }

    pub const fn timezone(&self) -> &Timezone {
        &self.timezone
    }
}
