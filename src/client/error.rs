//! Client error types.

use thiserror::Error;

/// Error talking to a backend service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Could not reach the service at all
    #[error("cannot connect to service: {0}")]
    ConnectionFailed(String),

    /// The service did not answer in time
    #[error("service response timeout")]
    Timeout,

    /// The service answered with a non-success status
    #[error("service error ({status}): {body}")]
    Status {
        status: u16,
        body: String,
    },

    /// The service answered, but reported failure in its envelope
    #[error("service error: {0}")]
    Api(String),

    /// The response body did not decode
    #[error("response parse error: {0}")]
    Parse(String),

    /// Anything else reqwest can fail with
    #[error("request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

/// Result type for client operations
pub type ApiResult<T> = Result<T, ApiError>;
