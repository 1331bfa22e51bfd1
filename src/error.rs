//! Error types for redrive

use thiserror::Error;

/// Main error type for the redrive library
#[derive(Error, Debug)]
pub enum Error {
    /// The API server could not be reached (timeout or connection failure)
    #[error("could not reach API server: {0}")]
    ServerUnreachable(String),

    /// The server rejected the supplied credentials (HTTP 401)
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The server rejected the request as malformed (HTTP 400)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The server failed while processing the request (HTTP 5xx)
    #[error("server error ({code}): {message}")]
    ServerError { code: u16, message: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Anything that does not fit a known category
    #[error("unclassified error: {0}")]
    Unclassified(String),
}

/// Result type alias for the redrive library
pub type Result<T> = std::result::Result<T, Error>;
