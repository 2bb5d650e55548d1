//! Session-authorization artifacts.
//!
//! A session starts from a network-issued [`Challenge`], is answered by
//! a [`SignedStatement`], and yields a [`SessionCredential`] scoped to
//! the abilities and resources that were requested.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::AccountAddress;

/// Derivation-method tag for statements signed by an external wallet.
pub const DERIVED_VIA_WALLET: &str = "web3";

/// A challenge issued by the decryption network during session
/// negotiation.
///
/// Consumed exactly once; the request URI and expiration are opaque
/// values chosen by the network and echoed into the signed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Opaque request URI identifying this challenge.
    pub uri: String,

    /// Expiration timestamp as supplied by the network (RFC 3339 text).
    pub expiration: String,
}

/// Proof of account control: a signature over a canonical statement.
///
/// Immutable once created. The `signed_message` field carries the exact
/// text that was signed so the network can re-derive the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedStatement {
    /// Hex-encoded signature over `signed_message`.
    pub sig: String,

    /// How the signature was derived (e.g. [`DERIVED_VIA_WALLET`]).
    pub derived_via: String,

    /// The canonical message text that was signed, verbatim.
    pub signed_message: String,

    /// The signing account.
    pub address: AccountAddress,
}

/// An ability that a session credential may be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Decryption gated on access-control conditions.
    #[serde(rename = "access-control-condition-decryption")]
    ConditionDecryption,

    /// Signing gated on access-control conditions.
    #[serde(rename = "access-control-condition-signing")]
    ConditionSigning,
}

impl Ability {
    /// The wire name of this ability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::ConditionDecryption => "access-control-condition-decryption",
            Ability::ConditionSigning => "access-control-condition-signing",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource pattern a scope applies to.
///
/// `*` matches any resource; a trailing `*` matches by prefix;
/// anything else matches exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePattern(String);

impl ResourcePattern {
    /// The wildcard pattern, matching every resource.
    pub fn wildcard() -> Self {
        Self("*".to_string())
    }

    /// A pattern matching exactly one resource.
    pub fn exact(resource: impl Into<String>) -> Self {
        Self(resource.into())
    }

    /// The pattern string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this pattern covers the given resource.
    pub fn matches(&self, resource: &str) -> bool {
        if self.0 == "*" {
            return true;
        }
        match self.0.strip_suffix('*') {
            Some(prefix) => resource.starts_with(prefix),
            None => self.0 == resource,
        }
    }

    /// Check whether this pattern covers everything another pattern
    /// could match.
    pub fn covers(&self, other: &ResourcePattern) -> bool {
        if self.0 == "*" {
            return true;
        }
        match other.0.strip_suffix('*') {
            // A narrower pattern only covers a wildcarded one if its
            // own wildcard prefix contains the other's.
            Some(prefix) => match self.0.strip_suffix('*') {
                Some(own) => prefix.starts_with(own),
                None => false,
            },
            None => self.matches(&other.0),
        }
    }
}

impl fmt::Display for ResourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One (resource, ability) pair requested during session negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeRequest {
    /// The resource pattern the ability applies to.
    pub resource: ResourcePattern,

    /// The requested ability.
    pub ability: Ability,
}

impl ScopeRequest {
    /// Request condition-gated decryption over the given pattern.
    pub fn decryption(resource: ResourcePattern) -> Self {
        Self {
            resource,
            ability: Ability::ConditionDecryption,
        }
    }

    /// Request condition-gated decryption over every resource.
    ///
    /// This is the scope both `encrypt` and `decrypt` negotiate with.
    pub fn decryption_wildcard() -> Self {
        Self::decryption(ResourcePattern::wildcard())
    }
}

/// A session credential: a signed-statement-backed capability grant.
///
/// Scoped to the delegations negotiated for it and bounded by a
/// validity window. Created per operation and discarded after use;
/// must not be reused across unrelated resource scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredential {
    /// Network-assigned session identifier.
    pub session_id: String,

    /// The (resource, ability) pairs this credential grants.
    pub delegations: Vec<ScopeRequest>,

    /// The proof artifact the network accepted.
    pub proof: SignedStatement,

    /// Start of the validity window (Unix milliseconds).
    pub issued_at: i64,

    /// End of the validity window (Unix milliseconds).
    pub expires_at: i64,
}

impl SessionCredential {
    /// Check whether this credential grants `ability` over `resource`.
    pub fn covers(&self, resource: &str, ability: Ability) -> bool {
        self.delegations
            .iter()
            .any(|d| d.ability == ability && d.resource.matches(resource))
    }

    /// Check whether this credential grants everything the given scope
    /// request asked for.
    pub fn covers_request(&self, request: &ScopeRequest) -> bool {
        self.delegations
            .iter()
            .any(|d| d.ability == request.ability && d.resource.covers(&request.resource))
    }

    /// Check the validity window at the given time (Unix milliseconds).
    pub fn is_valid_at(&self, now: i64) -> bool {
        now >= self.issued_at && now <= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(addr: &str) -> SignedStatement {
        SignedStatement {
            sig: "00".repeat(64),
            derived_via: DERIVED_VIA_WALLET.to_string(),
            signed_message: "msg".to_string(),
            address: AccountAddress::parse(addr).unwrap(),
        }
    }

    fn credential(delegations: Vec<ScopeRequest>) -> SessionCredential {
        SessionCredential {
            session_id: "session-1".to_string(),
            delegations,
            proof: statement("0x0101010101010101010101010101010101010101"),
            issued_at: 0,
            expires_at: 10_000,
        }
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let p = ResourcePattern::wildcard();
        assert!(p.matches("anything"));
        assert!(p.matches(""));
    }

    #[test]
    fn test_prefix_pattern() {
        let p = ResourcePattern::exact("acc://vault/*");
        assert!(p.matches("acc://vault/1"));
        assert!(!p.matches("acc://other/1"));
    }

    #[test]
    fn test_covers_pattern_hierarchy() {
        let all = ResourcePattern::wildcard();
        let vault = ResourcePattern::exact("acc://vault/*");
        let one = ResourcePattern::exact("acc://vault/1");

        assert!(all.covers(&vault));
        assert!(all.covers(&one));
        assert!(vault.covers(&one));
        assert!(!one.covers(&vault));
        assert!(!vault.covers(&all));
    }

    #[test]
    fn test_credential_scope_check() {
        let cred = credential(vec![ScopeRequest::decryption_wildcard()]);

        assert!(cred.covers("acc://anything", Ability::ConditionDecryption));
        assert!(!cred.covers("acc://anything", Ability::ConditionSigning));
        assert!(cred.covers_request(&ScopeRequest::decryption(ResourcePattern::exact("x"))));
    }

    #[test]
    fn test_credential_validity_window() {
        let cred = credential(vec![]);
        assert!(cred.is_valid_at(0));
        assert!(cred.is_valid_at(10_000));
        assert!(!cred.is_valid_at(10_001));
        assert!(!cred.is_valid_at(-1));
    }

    #[test]
    fn test_signed_statement_wire_names() {
        let s = statement("0x0101010101010101010101010101010101010101");
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("derivedVia").is_some());
        assert!(json.get("signedMessage").is_some());
        assert!(json.get("sig").is_some());
        assert!(json.get("address").is_some());
    }
}
