//! Error types for the globe client.

use std::fmt;

/// Result type for globe client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in globe client operations.
#[derive(Debug)]
pub enum Error {
    /// HTTP request failed.
    Http {
        /// The URL that failed.
        url: String,
        /// The error message.
        message: String,
    },
    /// HTTP response had a non-success status code.
    HttpStatus {
        /// The URL that returned the error.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// Invalid data in response or event payload.
    InvalidData {
        /// Context for where the error occurred.
        context: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
    /// Coordinate conversion failed.
    Projection(geoproject::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http { url, message } => {
                write!(f, "http request to {url} failed: {message}")
            }
            Error::HttpStatus { url, status } => {
                write!(f, "http request to {url} returned status {status}")
            }
            Error::InvalidData { context, detail } => {
                write!(f, "invalid {context}: {detail}")
            }
            Error::Projection(e) => write!(f, "projection error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Projection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<geoproject::Error> for Error {
    fn from(e: geoproject::Error) -> Self {
        Error::Projection(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidData {
            context: "country dataset",
            detail: e.to_string(),
        }
    }
}
