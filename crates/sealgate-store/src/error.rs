//! Error types for the blob store boundary.

use thiserror::Error;

/// Errors from blob storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No object under the given content identifier.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The backing service failed.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
