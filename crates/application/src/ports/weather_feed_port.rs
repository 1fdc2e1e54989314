//! Weather feed port
//!
//! Defines the interface for fetching a fresh reading from the upstream
//! station feed, independent of the feed's wire format.

use async_trait::async_trait;
use domain::Reading;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the upstream weather feed
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherFeedPort: Send + Sync {
    /// Fetch and parse the current observation
    ///
    /// Fails with `UpstreamUnavailable` on transport failures, timeouts and
    /// non-success statuses, and with `Parse` when the payload is incomplete
    /// or malformed. A failed fetch never yields a partial reading.
    async fn fetch(&self) -> Result<Reading, ApplicationError>;

    /// Name of the data source, attached to readings served from the store
    fn provider_name(&self) -> String;
}
