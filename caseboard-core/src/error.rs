//! Error types for caseboard-core

use thiserror::Error;

/// Main error type for the caseboard-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Case feed (HTTP) error
    #[error("case feed error: {0}")]
    Feed(String),

    /// A date given on the command line or in config could not be parsed
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Result type alias for caseboard-core
pub type Result<T> = std::result::Result<T, Error>;
