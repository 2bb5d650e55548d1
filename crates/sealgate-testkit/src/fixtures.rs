//! Test fixtures and helpers.
//!
//! Common setup for integration tests: a fake network wired to a
//! static oracle, plus registered and funded identities.

use std::sync::Arc;
use std::time::Duration;

use sealgate_core::{AccountIdentity, KeypairIdentity, NetworkId};
use sealgate_envelope::{AccessCondition, ConditionSet};
use sealgate_session::SiweChallengeSigner;

use crate::network::MemoryNetwork;
use crate::oracle::StaticOracle;

/// Default balance new fixture identities are funded with.
pub const DEFAULT_FUNDING: u128 = 1_000_000;

/// A fixture bundling a fake network, its oracle, and one funded,
/// registered identity.
pub struct TestFixture {
    pub network: MemoryNetwork,
    pub oracle: Arc<StaticOracle>,
    pub identity: Arc<KeypairIdentity>,
}

impl TestFixture {
    /// Create a fixture with one reachable network instance named
    /// `primary`.
    pub fn new() -> Self {
        Self::with_seed([0x11; 32])
    }

    /// Create with a deterministic identity seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        let oracle = Arc::new(StaticOracle::new(1));
        let network = MemoryNetwork::new(oracle.clone());
        network.set_reachable(&NetworkId::from("primary"), true);

        let identity = Arc::new(KeypairIdentity::from_seed(&seed));
        network.register_identity(&identity);
        oracle.set_balance(identity.address(), DEFAULT_FUNDING);

        Self {
            network,
            oracle,
            identity,
        }
    }

    /// Register another identity with the given seed and balance.
    pub fn add_identity(&self, seed: [u8; 32], balance: u128) -> Arc<KeypairIdentity> {
        let identity = Arc::new(KeypairIdentity::from_seed(&seed));
        self.network.register_identity(&identity);
        self.oracle.set_balance(identity.address(), balance);
        identity
    }

    /// Set the main identity's balance.
    pub fn fund(&self, amount: u128) {
        self.oracle.set_balance(self.identity.address(), amount);
    }

    /// A condition set the main identity satisfies at default funding.
    pub fn balance_gate(&self, min_balance: u128) -> ConditionSet {
        ConditionSet::single(AccessCondition::balance_at_least("ethereum", min_balance))
    }

    /// A challenge handler for the given identity with test-friendly
    /// parameters.
    pub fn handler(&self, identity: Arc<KeypairIdentity>) -> SiweChallengeSigner {
        SiweChallengeSigner::new(
            identity,
            "localhost",
            "Decrypt with the threshold network",
            1,
            Duration::from_secs(5),
        )
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealgate_core::ChainOracle;

    #[tokio::test]
    async fn test_fixture_identity_is_funded_and_registered() {
        let fixture = TestFixture::new();
        let balance = fixture
            .oracle
            .balance_of(fixture.identity.address())
            .await
            .unwrap();
        assert_eq!(balance, DEFAULT_FUNDING);
    }

    #[test]
    fn test_added_identities_are_distinct() {
        let fixture = TestFixture::new();
        let other = fixture.add_identity([0x22; 32], 0);
        assert_ne!(fixture.identity.address(), other.address());
    }
}
