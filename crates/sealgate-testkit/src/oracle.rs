//! A static chain oracle for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use sealgate_core::{AccountAddress, ChainOracle, CoreError};

/// Oracle answering from a fixed balance table.
///
/// Unknown accounts have balance zero, matching how a real chain
/// treats fresh addresses.
pub struct StaticOracle {
    chain_id: u64,
    balances: RwLock<HashMap<AccountAddress, u128>>,
}

impl StaticOracle {
    /// Create an oracle for the given chain id.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            balances: RwLock::new(HashMap::new()),
        }
    }

    /// Set an account's balance.
    pub fn set_balance(&self, address: &AccountAddress, amount: u128) {
        self.balances
            .write()
            .expect("oracle lock poisoned")
            .insert(address.clone(), amount);
    }
}

#[async_trait]
impl ChainOracle for StaticOracle {
    async fn balance_of(&self, address: &AccountAddress) -> Result<u128, CoreError> {
        Ok(*self
            .balances
            .read()
            .expect("oracle lock poisoned")
            .get(address)
            .unwrap_or(&0))
    }

    async fn chain_id(&self) -> Result<u64, CoreError> {
        Ok(self.chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_account_has_zero_balance() {
        let oracle = StaticOracle::new(1);
        let addr =
            AccountAddress::parse("0x0404040404040404040404040404040404040404").unwrap();
        assert_eq!(oracle.balance_of(&addr).await.unwrap(), 0);

        oracle.set_balance(&addr, 42);
        assert_eq!(oracle.balance_of(&addr).await.unwrap(), 42);
        assert_eq!(oracle.chain_id().await.unwrap(), 1);
    }
}
