//! Ordered endpoint fallback.
//!
//! Candidates are tried strictly in configured order; the first
//! successful dial wins. The selector establishes one connection per
//! call and never retries individual RPCs.

use std::time::Duration;

use sealgate_core::NetworkId;

use crate::error::{Result, SessionError};
use crate::network::{Dialer, NodeConnection};

/// Connects to the first reachable candidate network.
pub struct EndpointSelector<D: Dialer> {
    dialer: D,
    candidates: Vec<NetworkId>,
    connect_timeout: Duration,
}

impl<D: Dialer> EndpointSelector<D> {
    /// Create a selector over an ordered candidate list.
    pub fn new(dialer: D, candidates: Vec<NetworkId>, connect_timeout: Duration) -> Self {
        Self {
            dialer,
            candidates,
            connect_timeout,
        }
    }

    /// The configured candidates, in preference order.
    pub fn candidates(&self) -> &[NetworkId] {
        &self.candidates
    }

    /// Establish a connection to the earliest reachable candidate.
    ///
    /// Each dial is bounded by the connect timeout. Connection failure
    /// logs a warning and advances to the next candidate; only
    /// exhaustion is fatal.
    pub async fn connect(&self) -> Result<Box<dyn NodeConnection>> {
        let mut last_failure = "no candidates configured".to_string();

        for candidate in &self.candidates {
            match tokio::time::timeout(self.connect_timeout, self.dialer.dial(candidate)).await {
                Ok(Ok(connection)) => {
                    tracing::debug!(network = %candidate, "connected");
                    return Ok(connection);
                }
                Ok(Err(err)) => {
                    tracing::warn!(
                        network = %candidate,
                        error = %err,
                        "endpoint unreachable, trying next candidate"
                    );
                    last_failure = err.to_string();
                }
                Err(_) => {
                    tracing::warn!(
                        network = %candidate,
                        "connect timed out, trying next candidate"
                    );
                    last_failure = format!("connect to {candidate} timed out");
                }
            }
        }

        Err(SessionError::NoReachableEndpoint {
            attempted: self.candidates.len(),
            last: last_failure,
        })
    }
}
