//! Session credential negotiation.
//!
//! The authority drives one negotiation against an already-established
//! connection. Endpoint retry is the selector's job and happens before
//! this layer; a failed negotiation fails the whole operation, and any
//! caller-level retry starts over with a fresh connection.

use std::time::Duration;

use sealgate_core::{ScopeRequest, SessionCredential};

use crate::error::{Result, SessionError};
use crate::network::{ChallengeHandler, NodeConnection};

/// Timeouts for the session layer's suspension points.
///
/// Each network interaction carries its own independent bound.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bound on one dial attempt.
    pub connect_timeout: Duration,
    /// Bound on a whole negotiation, challenges included.
    pub negotiate_timeout: Duration,
    /// Bound on one challenge-signing step (may wait on external
    /// confirmation).
    pub sign_timeout: Duration,
    /// Bound on one encrypt or decrypt submission.
    pub submit_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            negotiate_timeout: Duration::from_secs(30),
            sign_timeout: Duration::from_secs(30),
            submit_timeout: Duration::from_secs(30),
        }
    }
}

/// Negotiates session credentials from a connected network.
pub struct SessionAuthority {
    config: SessionConfig,
}

impl SessionAuthority {
    /// Create an authority with the given timeouts.
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// The configured timeouts.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Negotiate a credential covering every requested scope.
    ///
    /// The connection invokes `handler` for each challenge the network
    /// issues. The returned credential is checked against the request
    /// list: a credential missing any requested (resource, ability)
    /// pair is a negotiation failure, since the network would reject it
    /// at submission time anyway.
    pub async fn negotiate(
        &self,
        connection: &dyn NodeConnection,
        chain: &str,
        requests: &[ScopeRequest],
        handler: &dyn ChallengeHandler,
    ) -> Result<SessionCredential> {
        if requests.is_empty() {
            return Err(SessionError::NegotiationFailed(
                "no scopes requested".to_string(),
            ));
        }

        let credential = tokio::time::timeout(
            self.config.negotiate_timeout,
            connection.negotiate_session(chain, requests, handler),
        )
        .await
        .map_err(|_| SessionError::Timeout("negotiating session".to_string()))??;

        for request in requests {
            if !credential.covers_request(request) {
                return Err(SessionError::NegotiationFailed(format!(
                    "credential does not cover {} over {}",
                    request.ability, request.resource
                )));
            }
        }

        tracing::debug!(
            network = %connection.network(),
            session = %credential.session_id,
            scopes = requests.len(),
            "session negotiated"
        );

        Ok(credential)
    }
}
