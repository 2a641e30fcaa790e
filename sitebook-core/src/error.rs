//! Error types for sitebook-core

use thiserror::Error;

/// Main error type for the sitebook-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Project not found
    #[error("project not found: {0}")]
    ProjectNotFound(i64),

    /// Worker not found
    #[error("worker not found: {0}")]
    WorkerNotFound(i64),

    /// Vendor not found
    #[error("vendor not found: {0}")]
    VendorNotFound(i64),

    /// The dataset snapshot could not be obtained from storage
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// Rejected input (e.g. a non-positive payment amount)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Wrap any storage failure as [`Error::DataUnavailable`].
    ///
    /// Already-unavailable errors pass through untouched.
    pub fn unavailable(self) -> Self {
        match self {
            Error::DataUnavailable(_) => self,
            other => Error::DataUnavailable(other.to_string()),
        }
    }
}

/// Result type alias for sitebook-core
pub type Result<T> = std::result::Result<T, Error>;
