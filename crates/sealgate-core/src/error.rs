//! Error types for core primitives.

use thiserror::Error;

/// Errors from core types and capabilities.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Address is not 20 bytes of hex.
    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    /// Hash string is not 32 bytes of hex.
    #[error("invalid content hash: {0}")]
    InvalidHash(String),

    /// The identity's signer declined or failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The chain oracle could not answer.
    #[error("oracle unavailable: {0}")]
    OracleUnavailable(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
