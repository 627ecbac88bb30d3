//! Error types for the site runtime

use thiserror::Error;

/// Result type alias for site operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, binding or serving the site
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize a component (HTTP client, server socket)
    #[error("Initialization failed: {0}")]
    InitializationError(String),

    /// The request could not be sent or the transport failed
    #[error("Network error: {0}")]
    Network(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// The server answered with a non-success status
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// A response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A selector string is not supported
    #[error("Invalid selector: {0}")]
    Selector(String),

    /// A node required by an operation is not present in the document
    #[error("Missing node: {0}")]
    MissingNode(String),

    /// Carousel index outside `1..=total`
    #[error("Slide {index} out of range (1..={total})")]
    SlideOutOfRange { index: usize, total: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Error::Http { status: status.as_u16() }
        } else {
            Error::Network(err.to_string())
        }
    }
}
