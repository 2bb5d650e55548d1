//! # Sealgate Envelope
//!
//! Access-control conditions and the portable encrypted envelope.
//!
//! ## Overview
//!
//! Plaintext is sealed by the decryption network into an
//! [`AccessEnvelope`]: ciphertext, a content-hash binding, the
//! [`ConditionSet`] gating future decryption, and format metadata. The
//! wire form ([`RawEnvelope`]) tolerates omitted fields and a legacy
//! condition field name; [`validate`] is the single place where those
//! tolerances are resolved into one normal form.
//!
//! Everything in this crate is a pure data transformation. Network
//! calls, sessions, and storage live elsewhere.

pub mod conditions;
pub mod envelope;
pub mod error;

pub use conditions::{
    AccessCondition, Comparator, ConditionSet, ReturnValueTest, CONDITION_TYPE_EVM_BASIC,
    PARAM_USER_ADDRESS,
};
pub use envelope::{
    validate, AccessEnvelope, EnvelopeDefaults, RawEnvelope, DEFAULT_CHAIN, DEFAULT_DATA_TYPE,
    DEFAULT_VERSION,
};
pub use error::{EnvelopeError, Result};
