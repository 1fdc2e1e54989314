//! Reading store port
//!
//! Append-only persistence for weather readings ordered by observation time.
//! Adapters in the infrastructure layer implement this port using SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::Reading;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Highest and lowest temperature over a time range
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TemperatureExtremes {
    /// Highest temperature, `None` when the range holds no readings
    pub max: Option<f64>,
    /// Lowest temperature, `None` when the range holds no readings
    pub min: Option<f64>,
}

impl TemperatureExtremes {
    /// Extremes of an empty range
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            max: None,
            min: None,
        }
    }

    /// Check if the range held no readings
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.max.is_none() && self.min.is_none()
    }
}

/// Port for reading persistence
///
/// Implementations must be safe under concurrent callers and must surface
/// every persistence failure as `ApplicationError::Storage`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReadingStorePort: Send + Sync {
    /// Durably persist one valid reading
    ///
    /// The provider name is not persisted. Placeholders are rejected.
    async fn append(&self, reading: &Reading) -> Result<(), ApplicationError>;

    /// Most recent reading observed at or before `at`
    async fn latest_at_or_before(
        &self,
        at: DateTime<Utc>,
    ) -> Result<Option<Reading>, ApplicationError>;

    /// Highest and lowest temperature of readings observed at or after `since`
    async fn extremes_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<TemperatureExtremes, ApplicationError>;

    /// Number of stored readings
    async fn count(&self) -> Result<u64, ApplicationError>;
}
