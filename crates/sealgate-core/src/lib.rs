//! # Sealgate Core
//!
//! Core primitives for wallet-authenticated conditional encryption:
//!
//! - **Identity**: an account address plus a signing capability
//! - **Challenge / SignedStatement**: the signed-challenge handshake
//! - **SessionCredential**: a scope-limited, time-bounded capability grant
//! - **ChainOracle**: the boundary to on-chain account state
//!
//! Identities and credentials never cross the storage boundary; the
//! only persisted artifact in the system is the access envelope, which
//! lives in `sealgate-envelope`.

pub mod auth;
pub mod error;
pub mod identity;
pub mod oracle;
pub mod types;

pub use auth::{
    Ability, Challenge, ResourcePattern, ScopeRequest, SessionCredential, SignedStatement,
    DERIVED_VIA_WALLET,
};
pub use error::{CoreError, Result};
pub use identity::{AccountIdentity, KeypairIdentity, SharedIdentity};
pub use oracle::ChainOracle;
pub use types::{AccountAddress, ContentHash, NetworkId};
