use thiserror::Error;

/// Errors surfaced by [`ManagementApi`](crate::ManagementApi) implementations.
///
/// Wire-level implementations map their transport errors into these
/// variants so the reconciler never depends on a concrete HTTP stack.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or connection failure before a response was obtained
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote rejected the presented credentials
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Authenticated but not allowed
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The addressed resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote rejected the request as malformed
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Any other error status from the remote
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be interpreted
    #[error("invalid response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
