//! Transport-level errors.

use std::time::Duration;

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures that prevent a response body from being obtained or decoded.
///
/// "No data" answers are not errors at this level; they decode into the
/// normal response types and are interpreted by the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Response from {url} (HTTP {status}) is not valid JSON: {source}")]
    InvalidBody {
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}
