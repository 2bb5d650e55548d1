//! Error types for the top-level client.

use thiserror::Error;

use sealgate_envelope::EnvelopeError;
use sealgate_session::SessionError;
use sealgate_store::StoreError;

/// Errors from the unified client API.
///
/// The layered variants preserve the source taxonomy so callers can
/// route remediation: envelope errors mean fix the input, access
/// denial means obtain access, service and connectivity errors mean
/// wait and retry.
#[derive(Debug, Error)]
pub enum SealgateError {
    /// The envelope failed validation or normalization.
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// Connectivity, negotiation, or network-side failure.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// The blob store rejected a publish or fetch.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The network returned data whose hash does not match the
    /// envelope's content hash. The payload was corrupted or
    /// substituted somewhere between sealing and now.
    #[error("content hash mismatch: decrypted data does not match the envelope")]
    HashMismatch,

    /// A fetched object was not UTF-8 JSON.
    #[error("fetched object is not a valid envelope: {0}")]
    NotAnEnvelope(String),
}

impl SealgateError {
    /// True when the calling identity failed the access conditions.
    ///
    /// Retrying without changing the identity's on-chain state cannot
    /// succeed.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::Session(SessionError::AccessDenied))
    }

    /// True for transient faults worth retrying with backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Session(err) => matches!(
                err,
                SessionError::NoReachableEndpoint { .. }
                    | SessionError::ConnectFailed(_)
                    | SessionError::Service(_)
                    | SessionError::Timeout(_)
            ),
            Self::Store(StoreError::Backend(_)) => true,
            _ => false,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, SealgateError>;
