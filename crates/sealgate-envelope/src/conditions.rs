//! Access-control conditions.
//!
//! A condition names a chain, an observable (a contract-free RPC method
//! such as a balance query), and a comparator over its result. The
//! decryption network evaluates conditions; the comparator logic lives
//! here so local tooling and test networks can evaluate too.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EnvelopeError, Result};

/// Condition family for basic EVM state queries.
pub const CONDITION_TYPE_EVM_BASIC: &str = "evmBasic";

/// Placeholder substituted with the requesting account's address at
/// evaluation time.
pub const PARAM_USER_ADDRESS: &str = ":userAddress";

/// Comparison operator in a [`ReturnValueTest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparator::GreaterOrEqual => ">=",
            Comparator::Greater => ">",
            Comparator::Equal => "=",
            Comparator::NotEqual => "!=",
            Comparator::Less => "<",
            Comparator::LessOrEqual => "<=",
        };
        f.write_str(s)
    }
}

/// The comparator and threshold a queried value is tested against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnValueTest {
    /// The comparison operator.
    pub comparator: Comparator,

    /// Threshold as a decimal string (chain values exceed u64).
    pub value: String,
}

impl ReturnValueTest {
    /// Evaluate the test against a numeric observed value.
    ///
    /// Fails if the threshold is not a decimal integer.
    pub fn check_numeric(&self, observed: u128) -> Result<bool> {
        let threshold: u128 = self
            .value
            .parse()
            .map_err(|_| EnvelopeError::InvalidThreshold(self.value.clone()))?;

        Ok(match self.comparator {
            Comparator::GreaterOrEqual => observed >= threshold,
            Comparator::Greater => observed > threshold,
            Comparator::Equal => observed == threshold,
            Comparator::NotEqual => observed != threshold,
            Comparator::Less => observed < threshold,
            Comparator::LessOrEqual => observed <= threshold,
        })
    }
}

/// One access-control predicate.
///
/// Serializes to the network's wire shape (camelCase field names).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCondition {
    /// Condition family, e.g. [`CONDITION_TYPE_EVM_BASIC`].
    pub condition_type: String,

    /// Target contract; empty for chain-level queries.
    pub contract_address: String,

    /// Contract standard (ERC20, ERC721, ...); empty for chain-level.
    pub standard_contract_type: String,

    /// Chain the observable is read from.
    pub chain: String,

    /// RPC method naming the observable.
    pub method: String,

    /// Method parameters; may contain [`PARAM_USER_ADDRESS`].
    pub parameters: Vec<String>,

    /// The test applied to the method's return value.
    pub return_value_test: ReturnValueTest,
}

impl AccessCondition {
    /// A balance gate: the requesting account must hold at least
    /// `min_balance` base units on `chain`.
    pub fn balance_at_least(chain: impl Into<String>, min_balance: u128) -> Self {
        Self {
            condition_type: CONDITION_TYPE_EVM_BASIC.to_string(),
            contract_address: String::new(),
            standard_contract_type: String::new(),
            chain: chain.into(),
            method: "eth_getBalance".to_string(),
            parameters: vec![PARAM_USER_ADDRESS.to_string(), "latest".to_string()],
            return_value_test: ReturnValueTest {
                comparator: Comparator::GreaterOrEqual,
                value: min_balance.to_string(),
            },
        }
    }

    /// Whether this condition queries the requesting account's balance.
    pub fn is_balance_query(&self) -> bool {
        self.method == "eth_getBalance"
            && self.parameters.first().map(String::as_str) == Some(PARAM_USER_ADDRESS)
    }
}

/// An ordered set of access conditions, all of which must hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ConditionSet(Vec<AccessCondition>);

impl ConditionSet {
    /// An empty set. Empty sets never validate into an envelope.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A set holding a single condition.
    pub fn single(condition: AccessCondition) -> Self {
        Self(vec![condition])
    }

    /// Append a condition, preserving order.
    pub fn push(&mut self, condition: AccessCondition) {
        self.0.push(condition);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AccessCondition> {
        self.0.iter()
    }
}

impl From<Vec<AccessCondition>> for ConditionSet {
    fn from(conditions: Vec<AccessCondition>) -> Self {
        Self(conditions)
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a AccessCondition;
    type IntoIter = std::slice::Iter<'a, AccessCondition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
