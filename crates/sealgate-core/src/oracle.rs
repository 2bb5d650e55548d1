//! The account/chain oracle boundary.
//!
//! Condition evaluation happens inside the decryption network, which
//! observes chain state through this interface. The core only defines
//! the contract; testkit provides a static implementation.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::AccountAddress;

/// Read-only view of account and chain state.
#[async_trait]
pub trait ChainOracle: Send + Sync {
    /// Current balance of an account, in the chain's base unit.
    async fn balance_of(&self, address: &AccountAddress) -> Result<u128, CoreError>;

    /// Numeric identifier of the chain this oracle observes.
    async fn chain_id(&self) -> Result<u64, CoreError>;
}
