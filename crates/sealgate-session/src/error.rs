//! Error types for session negotiation and network access.

use thiserror::Error;

/// Errors from the session and network layer.
///
/// Callers distinguish three remediations: fix the input (handled in
/// `sealgate-envelope` before this layer runs), obtain access
/// ([`SessionError::AccessDenied`], never auto-retried), or wait and
/// retry ([`SessionError::Service`] and the connectivity variants).
#[derive(Debug, Error)]
pub enum SessionError {
    /// Every candidate network was unreachable.
    #[error("no reachable endpoint after {attempted} candidates: {last}")]
    NoReachableEndpoint {
        /// How many candidates were tried.
        attempted: usize,
        /// The last connection failure observed.
        last: String,
    },

    /// A single dial attempt failed (timeout, handshake, protocol
    /// mismatch). Dialers return this; the selector folds it into
    /// [`SessionError::NoReachableEndpoint`] once all candidates fail.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// The identity declined or failed to sign the challenge.
    #[error("signing rejected: {0}")]
    SigningRejected(String),

    /// A pending challenge was cancelled or timed out before the
    /// signer answered.
    #[error("operation cancelled: {0}")]
    OperationCancelled(String),

    /// The network rejected the signed statements or returned a
    /// credential that does not cover the requested scopes.
    #[error("session negotiation failed: {0}")]
    NegotiationFailed(String),

    /// The requesting identity does not satisfy the envelope's
    /// conditions. Distinct from transport failure; not retryable.
    #[error("access denied: conditions not satisfied")]
    AccessDenied,

    /// Transport or protocol fault during an RPC. Retryable by the
    /// caller with backoff; never retried here.
    #[error("decryption service error: {0}")]
    Service(String),

    /// A suspension point exceeded its configured timeout.
    #[error("timed out while {0}")]
    Timeout(String),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
