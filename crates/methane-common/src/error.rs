//! Error types for methane-mapper crates.

use thiserror::Error;

/// Result type alias using MapperError.
pub type MapperResult<T> = Result<T, MapperError>;

/// Primary error type for controller and configuration operations.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Unknown basemap: {0}")]
    UnknownBasemap(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("No factory data found.")]
    NoFactoryData,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MapperError {
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        MapperError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        MapperError::Config(format!("JSON error: {}", err))
    }
}
