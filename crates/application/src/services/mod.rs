//! Application services - Use case implementations

mod daily_aggregator;
mod freshness_cache;
mod weather_service;

pub use daily_aggregator::{DailyAggregator, ReportSchedule};
pub use freshness_cache::FreshnessCache;
pub use weather_service::{WeatherService, WeatherServiceConfig};
