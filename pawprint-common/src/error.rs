//! Common error types for the paw-print tools

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for paw-print operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the collection and annotation tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error (worklist, annotation map, metadata table)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON read/write error (geocode cache)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required file does not exist
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Malformed input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
