//! In-memory fakes shared by service tests

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use domain::{Measurements, Reading, WindDirection};
use parking_lot::Mutex;

use crate::{
    error::ApplicationError,
    ports::{ReadingStorePort, TemperatureExtremes, WeatherFeedPort},
};

pub(crate) const PROVIDER: &str = "Test Station";

pub(crate) fn measurements(temperature: f64) -> Measurements {
    Measurements {
        temperature,
        pressure: 1012.5,
        humidity: 80.0,
        wind_speed: 1.8,
        wind_direction: WindDirection::new(200),
        rain_per_hour: 0.0,
        rain_per_minute: 0.0,
        ground_temperature: temperature + 1.0,
    }
}

pub(crate) fn reading_at(at: DateTime<Utc>, temperature: f64) -> Reading {
    Reading::new(at.fixed_offset(), measurements(temperature))
        .unwrap()
        .with_provider(PROVIDER)
}

/// Vec-backed store with the same query semantics as the SQLite store
#[derive(Debug, Default)]
pub(crate) struct InMemoryReadingStore {
    readings: Mutex<Vec<Reading>>,
}

impl InMemoryReadingStore {
    pub(crate) fn with_readings(readings: Vec<Reading>) -> Self {
        Self {
            readings: Mutex::new(readings),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.readings.lock().len()
    }
}

#[async_trait]
impl ReadingStorePort for InMemoryReadingStore {
    async fn append(&self, reading: &Reading) -> Result<(), ApplicationError> {
        if !reading.is_valid() {
            return Err(ApplicationError::Storage("placeholder".into()));
        }
        let mut stored = reading.clone();
        stored.provider_name.clear();
        self.readings.lock().push(stored);
        Ok(())
    }

    async fn latest_at_or_before(
        &self,
        at: DateTime<Utc>,
    ) -> Result<Option<Reading>, ApplicationError> {
        Ok(self
            .readings
            .lock()
            .iter()
            .filter(|r| r.observed_at <= at)
            .max_by_key(|r| r.observed_at)
            .cloned())
    }

    async fn extremes_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<TemperatureExtremes, ApplicationError> {
        let readings = self.readings.lock();
        let temps = readings
            .iter()
            .filter(|r| r.observed_at >= since)
            .map(|r| r.measurements.temperature);
        Ok(temps.fold(TemperatureExtremes::empty(), |acc, t| TemperatureExtremes {
            max: Some(acc.max.map_or(t, |m| m.max(t))),
            min: Some(acc.min.map_or(t, |m| m.min(t))),
        }))
    }

    async fn count(&self) -> Result<u64, ApplicationError> {
        Ok(self.readings.lock().len() as u64)
    }
}

/// What a `CountingFeed` answers with
#[derive(Debug, Clone)]
pub(crate) enum FeedBehavior {
    Succeed(Reading),
    Unavailable,
}

/// Feed fake that counts calls and can be slowed down
#[derive(Debug)]
pub(crate) struct CountingFeed {
    behavior: FeedBehavior,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl CountingFeed {
    pub(crate) const fn new(behavior: FeedBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherFeedPort for CountingFeed {
    async fn fetch(&self) -> Result<Reading, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay.and_then(|d| d.to_std().ok()) {
            tokio::time::sleep(delay).await;
        }
        match &self.behavior {
            FeedBehavior::Succeed(reading) => Ok(reading.clone()),
            FeedBehavior::Unavailable => {
                Err(ApplicationError::UpstreamUnavailable("connection refused".into()))
            },
        }
    }

    fn provider_name(&self) -> String {
        PROVIDER.to_string()
    }
}
