//! Freshness cache
//!
//! Cache-aside over the reading store. A stored reading younger than the
//! caller's `max_age` is served directly; otherwise the feed is fetched and
//! the new reading appended before it is returned.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use domain::{Reading, Timezone};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{ReadingStorePort, WeatherFeedPort},
};

type SharedFetch = Shared<BoxFuture<'static, Result<Reading, ApplicationError>>>;

/// Serves stored readings while fresh and fetches from the feed otherwise
pub struct FreshnessCache {
    store: Arc<dyn ReadingStorePort>,
    feed: Arc<dyn WeatherFeedPort>,
    timezone: Timezone,
    /// Fetch currently in flight, joined by concurrent misses when coalescing
    in_flight: Option<Mutex<Option<SharedFetch>>>,
}

impl fmt::Debug for FreshnessCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreshnessCache")
            .field("timezone", &self.timezone)
            .field("coalesce_fetches", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

impl FreshnessCache {
    /// Create a cache over the given store and feed
    ///
    /// Readings are returned with timestamps expressed in `timezone`.
    pub fn new(
        store: Arc<dyn ReadingStorePort>,
        feed: Arc<dyn WeatherFeedPort>,
        timezone: Timezone,
    ) -> Self {
        Self {
            store,
            feed,
            timezone,
            in_flight: None,
        }
    }

    /// Let concurrent misses share a single feed fetch
    ///
    /// Misses that arrive while a fetch is running await that fetch and
    /// receive its outcome, success or failure, so a burst of requests costs
    /// one upstream call.
    #[must_use]
    pub fn with_fetch_coalescing(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(|| Mutex::new(None));
        self
    }

    /// Timezone readings are expressed in
    #[must_use]
    pub const fn timezone(&self) -> &Timezone {
        &self.timezone
    }

    /// Read-only lookup: the latest reading at or before `reference` if it is
    /// strictly younger than `max_age`
    ///
    /// Never contacts the feed.
    #[instrument(skip(self), fields(max_age_secs = max_age.num_seconds()))]
    pub async fn lookup(
        &self,
        max_age: Duration,
        reference: DateTime<Utc>,
    ) -> Result<Option<Reading>, ApplicationError> {
        let Some(stored) = self.store.latest_at_or_before(reference).await? else {
            debug!("No stored reading at or before reference");
            return Ok(None);
        };

        if !stored.is_fresh_at(reference, max_age) {
            debug!(
                age_secs = stored.age_at(reference).num_seconds(),
                "Stored reading is stale"
            );
            return Ok(None);
        }

        let mut reading = stored
            .with_provider(self.feed.provider_name())
            .in_timezone(&self.timezone);
        reading.valid = true;
        Ok(Some(reading))
    }

    /// Return a fresh reading, fetching from the feed on a miss
    ///
    /// # Errors
    ///
    /// Propagates feed errors unchanged; nothing is stored in that case.
    /// Storage failures surface as `ApplicationError::Storage`.
    #[instrument(skip(self), fields(max_age_secs = max_age.num_seconds()))]
    pub async fn get_or_fetch(
        &self,
        max_age: Duration,
        reference: DateTime<Utc>,
    ) -> Result<Reading, ApplicationError> {
        if let Some(reading) = self.lookup(max_age, reference).await? {
            debug!(observed_at = %reading.observed_at, "Cache hit");
            return Ok(reading);
        }

        let Some(slot) = &self.in_flight else {
            return self.fetch_and_store().await;
        };

        let fetch = {
            let mut current = slot.lock();
            let running = current
                .as_ref()
                .filter(|running| running.peek().is_none())
                .cloned();
            if let Some(running) = running {
                debug!("Joining fetch already in flight");
                running
            } else {
                let started = self.fetch_and_store().shared();
                *current = Some(started.clone());
                started
            }
        };

        let result = fetch.clone().await;

        {
            let mut current = slot.lock();
            if current.as_ref().is_some_and(|running| running.ptr_eq(&fetch)) {
                *current = None;
            }
        }
        result
    }

    fn fetch_and_store(&self) -> BoxFuture<'static, Result<Reading, ApplicationError>> {
        let store = Arc::clone(&self.store);
        let feed = Arc::clone(&self.feed);
        let timezone = self.timezone;

        async move {
            let reading = feed
                .fetch()
                .await
                .inspect_err(|e| warn!(error = %e, "Weather feed fetch failed"))?;

            store.append(&reading).await?;
            info!(
                observed_at = %reading.observed_at,
                temperature = reading.measurements.temperature,
                "Stored new reading"
            );

            Ok(reading.in_timezone(&timezone))
        }
        .boxed()
    }
}
