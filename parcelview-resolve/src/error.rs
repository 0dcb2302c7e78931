//! Error types for resolver operations

use thiserror::Error;

/// Errors from talking to the geocoder or feature services
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Network or HTTP transport error
    #[error("Remote communication error: {0}")]
    Remote(String),

    /// Service answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ResolveError {
    fn from(e: reqwest::Error) -> Self {
        ResolveError::Remote(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
