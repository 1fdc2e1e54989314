//! Application layer - Use cases and orchestration
//!
//! Contains the freshness cache, the daily aggregator, the weather service
//! facade and the port definitions the infrastructure layer implements.

pub mod error;
pub mod ports;
pub mod services;
#[cfg(test)]
pub(crate) mod testing;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
