//! # Sealgate Session
//!
//! The network-facing layer: endpoint selection, challenge signing,
//! and session-credential negotiation.
//!
//! ## Flow
//!
//! 1. [`EndpointSelector`] dials the ordered candidate networks and
//!    returns the first live [`NodeConnection`].
//! 2. [`SessionAuthority::negotiate`] submits scope requests; the
//!    network answers with challenges, each resolved by the
//!    [`ChallengeHandler`] capability (normally a
//!    [`SiweChallengeSigner`] wrapping the caller's identity).
//! 3. The resulting [`sealgate_core::SessionCredential`] accompanies
//!    encrypt/decrypt submissions on the same connection.
//!
//! Every suspension point carries an independent timeout from
//! [`SessionConfig`]; a signer that never answers surfaces
//! `OperationCancelled` rather than hanging negotiation.

pub mod authority;
pub mod endpoint;
pub mod error;
pub mod network;
pub mod siwe;

pub use authority::{SessionAuthority, SessionConfig};
pub use endpoint::EndpointSelector;
pub use error::{Result, SessionError};
pub use network::{ChallengeHandler, Dialer, NodeConnection, SealedPayload};
pub use siwe::{SiweChallengeSigner, SiweMessage, SIWE_VERSION};
