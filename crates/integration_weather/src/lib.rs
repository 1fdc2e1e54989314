//! Campus weather station feed
//!
//! HTTP client for the station endpoints plus one parser per upstream
//! format. The station page is scraped from HTML; the relay serves JSON.

pub mod client;
mod models;
pub mod parser;

pub use client::{FeedClient, FeedConfig, FeedError, StationFeedClient};
pub use models::Observation;
pub use parser::{FeedFormat, FeedParser, RelayJsonParser, StationHtmlParser};
