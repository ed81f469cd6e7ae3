//! Error types for pawprint-collect

use crate::geocode::GeocodeError;
use thiserror::Error;

/// Collection build error
#[derive(Debug, Error)]
pub enum CollectError {
    /// Worklist, map, cache or table I/O
    #[error(transparent)]
    Common(#[from] pawprint_common::Error),

    /// Geocoder could not be constructed
    #[error("Geocoder error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Post-run command failed
    #[error("Hook '{name}' failed: {reason}")]
    Hook { name: String, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for collection operations
pub type CollectResult<T> = Result<T, CollectError>;
