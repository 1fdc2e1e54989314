//! Application state shared across handlers

use std::sync::Arc;

use application::WeatherService;
use infrastructure::FreshnessConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Weather facade
    pub service: Arc<WeatherService>,
    /// Freshness windows for the page and the API
    pub freshness: Arc<FreshnessConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(service: Arc<WeatherService>, freshness: FreshnessConfig) -> Self {
        Self {
            service,
            freshness: Arc::new(freshness),
        }
    }
}
