//! Weather feed adapter - Implements WeatherFeedPort using integration_weather

use std::fmt;

use application::{error::ApplicationError, ports::WeatherFeedPort};
use async_trait::async_trait;
use domain::{Reading, Timezone};
use integration_weather::{FeedClient, FeedConfig, FeedError, StationFeedClient};
use tracing::{debug, instrument};

/// Adapter exposing the station feed client as a `WeatherFeedPort`
pub struct WeatherFeedAdapter {
    client: Box<dyn FeedClient>,
    provider_name: String,
}

impl fmt::Debug for WeatherFeedAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherFeedAdapter")
            .field("format", &self.client.format())
            .field("provider_name", &self.provider_name)
            .finish()
    }
}

impl WeatherFeedAdapter {
    /// Create an adapter over a reqwest station client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(
        config: FeedConfig,
        timezone: Timezone,
        provider_name: impl Into<String>,
    ) -> Result<Self, ApplicationError> {
        let client = StationFeedClient::new(config, timezone)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_client(Box::new(client), provider_name))
    }

    /// Create an adapter over any feed client
    #[must_use]
    pub fn with_client(client: Box<dyn FeedClient>, provider_name: impl Into<String>) -> Self {
        Self {
            client,
            provider_name: provider_name.into(),
        }
    }

    /// Map integration feed error to application error
    fn map_error(err: FeedError) -> ApplicationError {
        match err {
            FeedError::Parse { reason, raw } => ApplicationError::Parse { reason, raw },
            other => ApplicationError::UpstreamUnavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl WeatherFeedPort for WeatherFeedAdapter {
    #[instrument(skip(self))]
    async fn fetch(&self) -> Result<Reading, ApplicationError> {
        let observation = self.client.fetch_observation().await.map_err(Self::map_error)?;
        let raw_time = observation.observed_at;

        let reading = observation
            .into_reading(&self.provider_name)
            .map_err(ApplicationError::from)?;

        debug!(observed_at = %raw_time, provider = %reading.provider_name, "Fetched reading");
        Ok(reading)
    }

    fn provider_name(&self) -> String {
        self.provider_name.clone()
    }
}
