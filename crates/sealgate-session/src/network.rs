//! The decryption-network RPC boundary.
//!
//! A [`Dialer`] turns a network identifier into a live
//! [`NodeConnection`]; the connection exposes the three logical RPCs
//! the core needs: session negotiation, encryption, and decryption.
//! Implementations may speak any transport.

use async_trait::async_trait;

use sealgate_core::{
    Challenge, ContentHash, NetworkId, ScopeRequest, SessionCredential, SignedStatement,
};
use sealgate_envelope::{AccessEnvelope, ConditionSet};

use crate::error::Result;

/// The ciphertext/hash pair produced by the network's encryption
/// primitive. Randomness is the network's; two calls with the same
/// plaintext yield different ciphertexts but the same hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPayload {
    /// Hex-encoded ciphertext.
    pub ciphertext: String,

    /// Content hash of the plaintext.
    pub data_to_encrypt_hash: ContentHash,
}

/// Resolves challenges issued by the network during negotiation.
///
/// This is the inversion-of-control seam: the network calls the
/// handler, not the other way around. At most one challenge per scope
/// request is expected; a handler may be invoked asynchronously at any
/// point while `negotiate_session` is pending.
#[async_trait]
pub trait ChallengeHandler: Send + Sync {
    /// Resolve one challenge into a signed statement.
    async fn on_challenge(&self, challenge: Challenge) -> Result<SignedStatement>;
}

/// A live connection to one decryption-network instance.
#[async_trait]
pub trait NodeConnection: Send + Sync {
    /// The network this connection was established to.
    fn network(&self) -> &NetworkId;

    /// Negotiate a session credential for the given scope requests.
    ///
    /// The network issues zero or more challenges through `handler`;
    /// each resolved statement is returned to the network as the
    /// callback response.
    async fn negotiate_session(
        &self,
        chain: &str,
        requests: &[ScopeRequest],
        handler: &dyn ChallengeHandler,
    ) -> Result<SessionCredential>;

    /// Encrypt plaintext under a condition set.
    ///
    /// The credential authorizes the *encrypting* identity to obtain
    /// the network's public encryption parameters; it says nothing
    /// about future decryptors.
    async fn encrypt(
        &self,
        credential: &SessionCredential,
        plaintext: &[u8],
        conditions: &ConditionSet,
        chain: &str,
    ) -> Result<SealedPayload>;

    /// Submit a credential and a validated envelope for decryption.
    ///
    /// Fails with [`crate::SessionError::AccessDenied`] when the
    /// credential's identity does not satisfy the envelope's
    /// conditions, and with [`crate::SessionError::Service`] for
    /// transport or protocol faults; the two must stay
    /// distinguishable.
    async fn decrypt(
        &self,
        credential: &SessionCredential,
        envelope: &AccessEnvelope,
    ) -> Result<Vec<u8>>;
}

/// Establishes connections to named network instances.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Dial one network. A failure here is not fatal to the operation;
    /// the endpoint selector advances to the next candidate.
    async fn dial(&self, network: &NetworkId) -> Result<Box<dyn NodeConnection>>;
}
