//! API error handling
//!
//! Every failure collapses to one of two bodies the web frontend knows:
//! `{"error":"data_unavailable"}` when the station answered with something
//! unreadable, and `{"error":"server_unavailable"}` for everything else.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// The station answered but the payload could not be parsed
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Station, database or configuration failure
    #[error("Server unavailable: {0}")]
    ServerUnavailable(String),
}

impl ApiError {
    /// Machine-readable code placed in the response body
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DataUnavailable(_) => "data_unavailable",
            Self::ServerUnavailable(_) => "server_unavailable",
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::DataUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::ServerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Parse { reason, raw } => {
                warn!(reason = %reason, raw_len = raw.len(), "Data unavailable");
                Self::DataUnavailable(reason)
            },
            other => {
                error!(error = %other, "Failed to load weather");
                Self::ServerUnavailable(other.to_string())
            },
        }
    }
}
