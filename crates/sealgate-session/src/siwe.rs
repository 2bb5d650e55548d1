//! Canonical signed-challenge messages.
//!
//! The message layout follows the Sign-In-With-Ethereum shape: a
//! domain preamble, the signer address, a human-readable purpose
//! statement, then labeled fields. The signer signs this exact text;
//! the network re-derives the signer from it.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use sealgate_core::{
    AccountAddress, AccountIdentity, Challenge, SignedStatement, DERIVED_VIA_WALLET,
};

use crate::error::{Result, SessionError};
use crate::network::ChallengeHandler;

/// Protocol version literal embedded in every signed message.
pub const SIWE_VERSION: &str = "1";

/// The canonical signable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiweMessage {
    /// Origin requesting the signature.
    pub domain: String,

    /// The signing account.
    pub address: AccountAddress,

    /// Human-readable purpose statement.
    pub statement: String,

    /// Challenge request URI, verbatim from the network.
    pub uri: String,

    /// Numeric chain identifier.
    pub chain_id: u64,

    /// Challenge expiration, verbatim from the network.
    pub expiration: String,
}

impl SiweMessage {
    /// Render the canonical message text.
    ///
    /// Layout is fixed; any change breaks signature re-derivation on
    /// the network side.
    pub fn format(&self) -> String {
        format!(
            "{domain} wants you to sign in with your account:\n\
             {address}\n\
             \n\
             {statement}\n\
             \n\
             URI: {uri}\n\
             Version: {version}\n\
             Chain ID: {chain_id}\n\
             Expiration Time: {expiration}",
            domain = self.domain,
            address = self.address,
            statement = self.statement,
            uri = self.uri,
            version = SIWE_VERSION,
            chain_id = self.chain_id,
            expiration = self.expiration,
        )
    }
}

/// Challenge handler that answers with a SIWE-style signed statement.
///
/// Holds the identity capability and the static message parameters;
/// each challenge contributes only its URI and expiration. The signing
/// step may block on external confirmation, so it runs under the sign
/// timeout and surfaces cancellation instead of hanging negotiation.
pub struct SiweChallengeSigner {
    identity: Arc<dyn AccountIdentity>,
    domain: String,
    statement: String,
    chain_id: u64,
    sign_timeout: Duration,
}

impl SiweChallengeSigner {
    /// Create a signer for one identity.
    pub fn new(
        identity: Arc<dyn AccountIdentity>,
        domain: impl Into<String>,
        statement: impl Into<String>,
        chain_id: u64,
        sign_timeout: Duration,
    ) -> Self {
        Self {
            identity,
            domain: domain.into(),
            statement: statement.into(),
            chain_id,
            sign_timeout,
        }
    }

    /// The canonical text that would be signed for a challenge.
    pub fn message_for(&self, challenge: &Challenge) -> String {
        SiweMessage {
            domain: self.domain.clone(),
            address: self.identity.address().clone(),
            statement: self.statement.clone(),
            uri: challenge.uri.clone(),
            chain_id: self.chain_id,
            expiration: challenge.expiration.clone(),
        }
        .format()
    }
}

#[async_trait]
impl ChallengeHandler for SiweChallengeSigner {
    async fn on_challenge(&self, challenge: Challenge) -> Result<SignedStatement> {
        let message = self.message_for(&challenge);

        let sig = match tokio::time::timeout(
            self.sign_timeout,
            self.identity.sign_message(&message),
        )
        .await
        {
            Ok(Ok(sig)) => sig,
            Ok(Err(err)) => return Err(SessionError::SigningRejected(err.to_string())),
            Err(_) => {
                return Err(SessionError::OperationCancelled(
                    "challenge signing timed out".to_string(),
                ))
            }
        };

        if sig.is_empty() {
            return Err(SessionError::SigningRejected(
                "signer returned no signature".to_string(),
            ));
        }

        Ok(SignedStatement {
            sig,
            derived_via: DERIVED_VIA_WALLET.to_string(),
            signed_message: message,
            address: self.identity.address().clone(),
        })
    }
}
