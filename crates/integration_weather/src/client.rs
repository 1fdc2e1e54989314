//! Station feed client
//!
//! HTTP client fetching the configured station endpoint and handing the body
//! to the parser for the configured format.

use std::time::Duration;

use async_trait::async_trait;
use domain::Timezone;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{
    models::Observation,
    parser::{FeedFormat, FeedParser},
};

/// Feed client errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Could not connect to the station endpoint
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the station endpoint failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The endpoint did not answer within the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Endpoint answered with a server error
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Endpoint answered with another non-success status
    #[error("Unexpected status: HTTP {0}")]
    UnexpectedStatus(u16),

    /// The body could not be turned into an observation
    #[error("Parse error: {reason}")]
    Parse {
        /// What was wrong
        reason: String,
        /// The unmodified response text
        raw: String,
    },
}

impl FeedError {
    /// Build a parse error carrying the raw response text
    pub fn parse(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Check if the payload arrived but could not be understood
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Raw response text for parse errors
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Upstream format (default: `ntu_as`)
    #[serde(default)]
    pub format: FeedFormat,

    /// Endpoint URL; the format's default endpoint when unset
    #[serde(default)]
    pub url: Option<String>,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header sent to the station
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("ntu-weather/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            format: FeedFormat::default(),
            url: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl FeedConfig {
    /// Endpoint actually requested
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.format.default_url())
    }
}

/// Client trait for fetching one observation from the station
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch and parse the current observation
    async fn fetch_observation(&self) -> Result<Observation, FeedError>;

    /// Format this client parses
    fn format(&self) -> FeedFormat;
}

/// reqwest-based station client
#[derive(Debug)]
pub struct StationFeedClient {
    client: Client,
    config: FeedConfig,
    parser: Box<dyn FeedParser>,
}

impl StationFeedClient {
    /// Create a client for the configured endpoint and format
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: FeedConfig, timezone: Timezone) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FeedError::ConnectionFailed(e.to_string()))?;
        let parser = config.format.parser(timezone);

        Ok(Self {
            client,
            config,
            parser,
        })
    }

    /// Create a client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults(timezone: Timezone) -> Result<Self, FeedError> {
        Self::new(FeedConfig::default(), timezone)
    }

    pub const fn config(&self) -> &FeedConfig {
        &self.config
    }

    fn map_send_error(&self, e: &reqwest::Error) -> FeedError {
        if e.is_timeout() {
            FeedError::Timeout(self.config.timeout_secs)
        } else if e.is_connect() {
            FeedError::ConnectionFailed(e.to_string())
        } else {
            FeedError::RequestFailed(e.to_string())
        }
    }

    /// Fetch the raw body, enforcing a success status
    async fn fetch_body(&self) -> Result<String, FeedError> {
        let url = self.config.endpoint();
        debug!(url = %url, "Fetching station feed");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FeedError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(FeedError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| self.map_send_error(&e))
    }
}

#[async_trait]
impl FeedClient for StationFeedClient {
    #[instrument(skip(self), fields(format = %self.config.format))]
    async fn fetch_observation(&self) -> Result<Observation, FeedError> {
        let body = self.fetch_body().await?;
        self.parser
            .parse(&body)
            .inspect_err(|e| warn!(error = %e, body_len = body.len(), "Station feed parse failed"))
    }

    fn format(&self) -> FeedFormat {
        self.config.format
    }
}
