//! Error types for the API client.

use thiserror::Error;

/// Errors that can occur when talking to the LogicMonitor REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status code.
    #[error("API returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, kept for diagnostics.
        body: String,
    },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A graph response was decoded but does not hold a usable series.
    #[error("Malformed series: {reason}")]
    MalformedSeries {
        /// What was wrong with the payload.
        reason: String,
        /// Raw response body.
        body: String,
    },

    /// The client was configured without a required setting.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Status code for [`ApiError::Status`], `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else {
            ApiError::Http(err.to_string())
        }
    }
}
