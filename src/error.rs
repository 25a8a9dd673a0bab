//! Error types for the reactive store.

use std::time::Duration;
use thiserror::Error;

/// Main error type for store and stream operations.
///
/// Errors are `Clone` so a cold stream can replay the same error signal to
/// every subscriber.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Index {index} out of bounds for state of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Refresh timed out after {0:?}")]
    RefreshTimeout(Duration),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Stream error: {0}")]
    Stream(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Deserialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
