//! Error types for envelope validation and encoding.

use thiserror::Error;

/// Errors from condition and envelope handling.
///
/// All of these fail before any network interaction.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// No condition set on either accepted field, or an empty set.
    #[error("envelope carries no access-control conditions")]
    MissingConditions,

    /// Both condition fields present but not identical.
    #[error("canonical and legacy condition fields disagree")]
    ConditionSetMismatch,

    /// A required field is absent or unparseable.
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// JSON encoding or decoding failed.
    #[error("envelope serialization: {0}")]
    Serialization(String),

    /// A return-value test threshold is not a decimal integer.
    #[error("non-numeric condition threshold: {0}")]
    InvalidThreshold(String),
}

/// Result type for envelope operations.
pub type Result<T> = std::result::Result<T, EnvelopeError>;
