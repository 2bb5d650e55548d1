//! The client: unified API for condition-gated encryption.
//!
//! Brings endpoint selection, session negotiation, envelope
//! normalization, and storage together behind two core operations,
//! encrypt and decrypt, plus publish/fetch against a blob store.

use std::sync::Arc;

use sealgate_core::{AccountIdentity, ContentHash, NetworkId, ScopeRequest};
use sealgate_envelope::{validate, AccessEnvelope, ConditionSet, EnvelopeDefaults, RawEnvelope};
use sealgate_session::{
    Dialer, EndpointSelector, NodeConnection, SessionAuthority, SessionConfig,
    SessionError, SiweChallengeSigner,
};
use sealgate_store::{BlobStore, ContentId, Tag};

use crate::error::{Result, SealgateError};

/// Purpose statement signed when establishing an encryption session.
pub const ENCRYPT_STATEMENT: &str = "Authorize encryption with the threshold network";

/// Purpose statement signed when establishing a decryption session.
pub const DECRYPT_STATEMENT: &str = "Authorize decryption with the threshold network";

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct SealgateConfig {
    /// Candidate networks, tried strictly in this order.
    pub networks: Vec<NetworkId>,
    /// Chain sessions and new envelopes are scoped to.
    pub chain: String,
    /// Numeric chain identifier embedded in signed statements.
    pub chain_id: u64,
    /// Origin named in signed statements.
    pub domain: String,
    /// Timeouts for the session layer.
    pub session: SessionConfig,
    /// Defaults applied when envelopes omit optional fields.
    pub defaults: EnvelopeDefaults,
    /// Application name tagged onto published envelopes.
    pub app_name: String,
    /// Application version tagged onto published envelopes.
    pub app_version: String,
}

impl Default for SealgateConfig {
    fn default() -> Self {
        Self {
            networks: vec![NetworkId::from("primary"), NetworkId::from("fallback")],
            chain: "ethereum".to_string(),
            chain_id: 1,
            domain: "localhost".to_string(),
            session: SessionConfig::default(),
            defaults: EnvelopeDefaults::default(),
            app_name: "sealgate".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// The main client struct.
///
/// Generic over the dialer so tests run against an in-process network
/// and production binds a real transport. Each operation establishes a
/// fresh connection and session; nothing is cached between calls, so a
/// caller-level retry starts clean.
pub struct Sealgate<D: Dialer> {
    selector: EndpointSelector<D>,
    authority: SessionAuthority,
    config: SealgateConfig,
}

impl<D: Dialer> Sealgate<D> {
    /// Create a client over a dialer.
    pub fn new(dialer: D, config: SealgateConfig) -> Self {
        let selector = EndpointSelector::new(
            dialer,
            config.networks.clone(),
            config.session.connect_timeout,
        );
        let authority = SessionAuthority::new(config.session.clone());
        Self {
            selector,
            authority,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &SealgateConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Core Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Encrypt plaintext under a condition set.
    ///
    /// Connects to the first reachable network, negotiates a session
    /// credential signed by `identity`, submits the plaintext for
    /// sealing, and assembles the portable envelope. An empty condition
    /// set fails before any network traffic.
    pub async fn encrypt(
        &self,
        identity: Arc<dyn AccountIdentity>,
        plaintext: &[u8],
        conditions: ConditionSet,
    ) -> Result<AccessEnvelope> {
        if conditions.is_empty() {
            return Err(sealgate_envelope::EnvelopeError::MissingConditions.into());
        }

        let connection = self.selector.connect().await?;
        let credential = self
            .negotiate(connection.as_ref(), identity, ENCRYPT_STATEMENT)
            .await?;

        let sealed = tokio::time::timeout(
            self.config.session.submit_timeout,
            connection.encrypt(&credential, plaintext, &conditions, &self.config.chain),
        )
        .await
        .map_err(|_| SessionError::Timeout("submitting encryption".to_string()))??;

        // The hash binds the envelope to the plaintext; never trust the
        // network's copy without checking it.
        if sealed.data_to_encrypt_hash != ContentHash::digest(plaintext) {
            return Err(SealgateError::HashMismatch);
        }

        tracing::debug!(
            network = %connection.network(),
            hash = %sealed.data_to_encrypt_hash,
            "plaintext sealed"
        );

        Ok(AccessEnvelope::assemble(
            sealed.ciphertext,
            sealed.data_to_encrypt_hash,
            conditions,
            Some(self.config.chain.clone()),
            &self.config.defaults,
        )?)
    }

    /// Decrypt an envelope, proving the conditions with `identity`.
    ///
    /// The raw envelope is validated and normalized before any network
    /// interaction; malformed input never costs a connection. Decrypted
    /// bytes are checked against the envelope's content hash before
    /// being returned.
    pub async fn decrypt(
        &self,
        identity: Arc<dyn AccountIdentity>,
        raw: &RawEnvelope,
    ) -> Result<Vec<u8>> {
        let envelope = validate(raw, &self.config.defaults)?;

        let connection = self.selector.connect().await?;
        let credential = self
            .negotiate(connection.as_ref(), identity, DECRYPT_STATEMENT)
            .await?;

        let plaintext = tokio::time::timeout(
            self.config.session.submit_timeout,
            connection.decrypt(&credential, &envelope),
        )
        .await
        .map_err(|_| SessionError::Timeout("submitting decryption".to_string()))??;

        if ContentHash::digest(&plaintext) != envelope.data_to_encrypt_hash {
            return Err(SealgateError::HashMismatch);
        }

        tracing::debug!(
            network = %connection.network(),
            hash = %envelope.data_to_encrypt_hash,
            "envelope opened"
        );

        Ok(plaintext)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Storage Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Publish an envelope to a blob store, returning its content id.
    ///
    /// The wire form is JSON with the condition set under both accepted
    /// field names. Tags identify the payload type and the producing
    /// application, in that order.
    pub async fn publish(
        &self,
        store: &dyn BlobStore,
        envelope: &AccessEnvelope,
    ) -> Result<ContentId> {
        let json = envelope.to_json()?;
        let tags = [
            Tag::new("Content-Type", "application/json"),
            Tag::new("App-Name", self.config.app_name.clone()),
            Tag::new("App-Version", self.config.app_version.clone()),
        ];

        let id = store.put(json.as_bytes(), &tags).await?;
        tracing::debug!(id = %id, "envelope published");
        Ok(id)
    }

    /// Fetch a published envelope by content id.
    ///
    /// Returns the raw wire form; [`Sealgate::decrypt`] validates it.
    pub async fn fetch(&self, store: &dyn BlobStore, id: &ContentId) -> Result<RawEnvelope> {
        let bytes = store.get(id).await?;
        let json = std::str::from_utf8(&bytes)
            .map_err(|e| SealgateError::NotAnEnvelope(e.to_string()))?;
        Ok(RawEnvelope::from_json(json)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Negotiate a wildcard decryption credential on a connection.
    async fn negotiate(
        &self,
        connection: &dyn NodeConnection,
        identity: Arc<dyn AccountIdentity>,
        statement: &str,
    ) -> Result<sealgate_core::SessionCredential> {
        let handler = SiweChallengeSigner::new(
            identity,
            self.config.domain.clone(),
            statement,
            self.config.chain_id,
            self.config.session.sign_timeout,
        );

        Ok(self
            .authority
            .negotiate(
                connection,
                &self.config.chain,
                &[ScopeRequest::decryption_wildcard()],
                &handler,
            )
            .await?)
    }
}
