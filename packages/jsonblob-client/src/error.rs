//! Error types for the blob client.

use thiserror::Error;

/// Result type for blob client operations.
pub type Result<T> = std::result::Result<T, BlobError>;

/// Blob client errors.
#[derive(Debug, Error)]
pub enum BlobError {
    /// Transport failure (connection refused, DNS, timeout, bad body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered 404 for a blob id
    #[error("blob not found: {id}")]
    NotFound { id: String },

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Create succeeded but the response carried no `Location` header
    #[error("create response is missing a Location header")]
    MissingLocation,

    /// `Location` header present but no usable id in its last path segment
    #[error("invalid Location header: {0}")]
    InvalidLocation(String),

    /// Blob id that cannot name a single document (empty, `.` or `..`)
    #[error("invalid blob id: {0:?}")]
    InvalidId(String),

    /// Configured base URL does not parse or cannot carry path segments
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
