//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod weather_feed_adapter;

pub use weather_feed_adapter::WeatherFeedAdapter;
