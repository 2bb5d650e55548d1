//! # Sealgate
//!
//! A client for condition-gated encryption over a threshold decryption
//! network. Plaintext is sealed against a set of on-chain access
//! conditions; anyone holding the envelope can decrypt exactly when
//! their wallet satisfies those conditions.
//!
//! ## Architecture
//!
//! - `sealgate-core`: addresses, hashes, identities, session scopes
//! - `sealgate-envelope`: the portable envelope and its normalization
//! - `sealgate-session`: endpoint fallback, challenge signing,
//!   credential negotiation
//! - `sealgate-store`: content-addressed blob storage
//! - this crate: the [`Sealgate`] client tying them together
//!
//! ## Example
//!
//! ```no_run
//! # async fn example<D: sealgate_session::Dialer>(
//! #     dialer: D,
//! #     identity: std::sync::Arc<dyn sealgate_core::AccountIdentity>,
//! # ) -> Result<(), sealgate::SealgateError> {
//! use sealgate::{Sealgate, SealgateConfig};
//! use sealgate_envelope::{AccessCondition, ConditionSet};
//!
//! let client = Sealgate::new(dialer, SealgateConfig::default());
//!
//! let gate = ConditionSet::single(AccessCondition::balance_at_least("ethereum", 1));
//! let envelope = client.encrypt(identity.clone(), b"secret", gate).await?;
//!
//! let plaintext = client.decrypt(identity, &envelope.to_raw()).await?;
//! assert_eq!(plaintext, b"secret");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{Sealgate, SealgateConfig, DECRYPT_STATEMENT, ENCRYPT_STATEMENT};
pub use error::{Result, SealgateError};

// Re-export the vocabulary types callers need to drive the client.
pub use sealgate_core::{AccountAddress, AccountIdentity, ContentHash, NetworkId};
pub use sealgate_envelope::{
    AccessCondition, AccessEnvelope, ConditionSet, EnvelopeDefaults, RawEnvelope,
};
pub use sealgate_session::{Dialer, SessionConfig, SessionError};
pub use sealgate_store::{BlobStore, ContentId, Tag};
