//! Error types for the core crate

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while parsing routes or validating model values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The path could not be mapped onto a route
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// A longitude or latitude was not a finite number in range
    #[error("Invalid coordinate {name}={value}")]
    InvalidCoordinate { name: &'static str, value: String },

    /// Parcel layer name other than `pwd` or `dor`
    #[error("Unknown parcel layer: {0}")]
    UnknownLayer(String),
}

impl CoreError {
    /// Create an invalid route error
    pub fn invalid_route(msg: impl Into<String>) -> Self {
        Self::InvalidRoute(msg.into())
    }

    /// Create an invalid coordinate error
    pub fn invalid_coordinate(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidCoordinate {
            name,
            value: value.into(),
        }
    }
}
