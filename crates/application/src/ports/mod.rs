//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod reading_store;
mod weather_feed_port;

#[cfg(test)]
pub use reading_store::MockReadingStorePort;
pub use reading_store::{ReadingStorePort, TemperatureExtremes};
#[cfg(test)]
pub use weather_feed_port::MockWeatherFeedPort;
pub use weather_feed_port::WeatherFeedPort;
