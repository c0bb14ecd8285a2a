//! Client error types

use stirrup_core::ApiError;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(err) if err.is_decode() => ApiError::Decode(err.to_string()),
            ClientError::Request(err) => ApiError::Transport(err.to_string()),
            ClientError::ServerError { status, message } => ApiError::Server { status, message },
            ClientError::AuthenticationFailed(message) => ApiError::AuthenticationFailed(message),
            ClientError::NotFound(message) => ApiError::NotFound(message),
            ClientError::BadRequest(message) => ApiError::BadRequest(message),
            ClientError::Forbidden(message) => ApiError::Forbidden(message),
            ClientError::Configuration(message) => ApiError::Transport(message),
        }
    }
}
