//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The upstream feed could not be reached or answered with a failure status
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream feed answered but the content could not be parsed
    #[error("Failed to parse weather feed: {reason}")]
    Parse {
        /// What went wrong
        reason: String,
        /// The raw response text, for diagnostics
        raw: String,
    },

    /// The reading store failed on read or write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Create a parse error carrying the raw upstream text
    pub fn parse(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Check if this error is retryable by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_) | Self::Storage(_))
    }

    /// Whether the failure means the feed content could not be understood
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Raw upstream text attached to a parse error
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
