//! Daily aggregator
//!
//! Builds the trailing 24-hour report: one entry per 3-hour slot, taken from
//! stored readings only. Slots without a reading close enough in time get a
//! placeholder.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use domain::Reading;
use futures::future::try_join_all;
use tracing::{debug, instrument};

use super::FreshnessCache;
use crate::error::ApplicationError;

/// Slot layout of the daily report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSchedule {
    /// Number of slots
    pub slots: u16,
    /// Distance between consecutive slots
    pub spacing: Duration,
    /// A reading qualifies for a slot if it is strictly younger than this at
    /// the slot time
    pub tolerance: Duration,
}

impl Default for ReportSchedule {
    fn default() -> Self {
        Self {
            slots: 8,
            spacing: Duration::hours(3),
            tolerance: Duration::minutes(30),
        }
    }
}

impl ReportSchedule {
    /// Slot times for `reference`, oldest first
    ///
    /// Slot `i` (1-based, counted backwards) lies `i * spacing` before the
    /// reference, so the newest slot is one spacing in the past.
    #[must_use]
    pub fn slot_times(&self, reference: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        (1..=self.slots)
            .rev()
            .map(|i| reference - self.spacing * i32::from(i))
            .collect()
    }
}

/// Produces the daily report from the reading store
#[derive(Debug, Clone)]
pub struct DailyAggregator {
    cache: Arc<FreshnessCache>,
    schedule: ReportSchedule,
}

impl DailyAggregator {
    pub const fn new(cache: Arc<FreshnessCache>, schedule: ReportSchedule) -> Self {
        Self { cache, schedule }
    }

    pub const fn schedule(&self) -> &ReportSchedule {
        &self.schedule
    }

    /// Report entries for the day before `reference`, oldest first
    ///
    /// Never contacts the feed. All slot lookups run concurrently.
    ///
    /// # Errors
    ///
    /// A storage failure on any slot fails the whole report.
    #[instrument(skip(self))]
    pub async fn report_at(&self, reference: DateTime<Utc>) -> Result<Vec<Reading>, ApplicationError> {
        let lookups = self
            .schedule
            .slot_times(reference)
            .into_iter()
            .map(|slot| self.slot_entry(slot));

        let entries = try_join_all(lookups).await?;
        debug!(
            filled = entries.iter().filter(|r| r.is_valid()).count(),
            slots = entries.len(),
            "Built daily report"
        );
        Ok(entries)
    }

    async fn slot_entry(&self, slot: DateTime<Utc>) -> Result<Reading, ApplicationError> {
        let entry = self.cache.lookup(self.schedule.tolerance, slot).await?;
        Ok(entry.unwrap_or_else(|| Reading::placeholder(self.cache.timezone().normalize(&slot))))
    }
}
