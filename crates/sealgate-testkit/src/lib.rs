//! # Sealgate Testkit
//!
//! Shared test infrastructure:
//!
//! - [`MemoryNetwork`]: an in-process fake of the whole threshold
//!   decryption service: challenge issuance, statement verification,
//!   session registry, authenticated sealing, condition evaluation,
//!   and per-instance reachability with dial/handshake logs
//! - [`StaticOracle`]: a fixed-balance chain oracle
//! - [`TestFixture`]: a wired-up network + oracle + funded identity
//! - [`generators`]: proptest strategies for conditions and envelopes
//!
//! Not part of the shipped API; consumed by the other crates' tests.

pub mod fixtures;
pub mod generators;
pub mod network;
pub mod oracle;

pub use fixtures::{TestFixture, DEFAULT_FUNDING};
pub use network::MemoryNetwork;
pub use oracle::StaticOracle;
