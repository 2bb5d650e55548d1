//! End-to-end client tests against the in-process fake network.
//!
//! The fake network really seals and opens payloads, verifies signed
//! statements, and evaluates balance conditions against an oracle, so
//! these exercise the full encrypt/decrypt path without any transport.

use std::sync::Arc;
use std::time::Duration;

use sealgate::{Sealgate, SealgateConfig, SealgateError};
use sealgate_core::{AccountAddress, AccountIdentity, CoreError, NetworkId};
use sealgate_envelope::{ConditionSet, EnvelopeError};
use sealgate_session::{SessionConfig, SessionError};
use sealgate_store::MemoryBlobStore;
use sealgate_testkit::{MemoryNetwork, TestFixture, DEFAULT_FUNDING};

fn client(fixture: &TestFixture) -> Sealgate<MemoryNetwork> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Sealgate::new(fixture.network.clone(), SealgateConfig::default())
}

#[tokio::test]
async fn test_encrypt_decrypt_roundtrip() {
    let fixture = TestFixture::new();
    let client = client(&fixture);

    let gate = fixture.balance_gate(100);
    let envelope = client
        .encrypt(fixture.identity.clone(), b"the launch codes", gate)
        .await
        .unwrap();

    assert_eq!(
        envelope.data_to_encrypt_hash,
        sealgate_core::ContentHash::digest(b"the launch codes")
    );
    assert_eq!(envelope.chain, "ethereum");

    let plaintext = client
        .decrypt(fixture.identity.clone(), &envelope.to_raw())
        .await
        .unwrap();
    assert_eq!(plaintext, b"the launch codes");
}

#[tokio::test]
async fn test_publish_fetch_decrypt() {
    let fixture = TestFixture::new();
    let client = client(&fixture);
    let store = MemoryBlobStore::new();

    let envelope = client
        .encrypt(fixture.identity.clone(), b"stored secret", fixture.balance_gate(1))
        .await
        .unwrap();

    let id = client.publish(&store, &envelope).await.unwrap();

    // Tags identify the payload and the producing app, in order
    let tags = store.tags_of(&id).await.unwrap();
    assert_eq!(tags[0].name, "Content-Type");
    assert_eq!(tags[0].value, "application/json");
    assert_eq!(tags[1].name, "App-Name");

    let raw = client.fetch(&store, &id).await.unwrap();
    let plaintext = client.decrypt(fixture.identity.clone(), &raw).await.unwrap();
    assert_eq!(plaintext, b"stored secret");
}

#[tokio::test]
async fn test_fallback_skips_unreachable_candidates() {
    let fixture = TestFixture::new();
    let mut config = SealgateConfig::default();
    config.networks = vec![
        NetworkId::from("down-a"),
        NetworkId::from("down-b"),
        NetworkId::from("primary"),
    ];
    let client = Sealgate::new(fixture.network.clone(), config);

    client
        .encrypt(fixture.identity.clone(), b"x", fixture.balance_gate(1))
        .await
        .unwrap();

    // Candidates were dialed strictly in order; only the live one
    // completed a handshake
    assert_eq!(
        fixture.network.dial_attempts(),
        vec![
            NetworkId::from("down-a"),
            NetworkId::from("down-b"),
            NetworkId::from("primary"),
        ]
    );
    assert_eq!(fixture.network.handshakes(), vec![NetworkId::from("primary")]);
}

#[tokio::test]
async fn test_all_candidates_down_is_retryable() {
    let fixture = TestFixture::new();
    fixture.network.set_reachable(&NetworkId::from("primary"), false);
    let client = client(&fixture);

    let err = client
        .encrypt(fixture.identity.clone(), b"x", fixture.balance_gate(1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SealgateError::Session(SessionError::NoReachableEndpoint { attempted: 2, .. })
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unqualified_identity_is_denied() {
    let fixture = TestFixture::new();
    let client = client(&fixture);

    let envelope = client
        .encrypt(
            fixture.identity.clone(),
            b"rich only",
            fixture.balance_gate(DEFAULT_FUNDING),
        )
        .await
        .unwrap();

    let pauper = fixture.add_identity([0x42; 32], 0);
    let err = client.decrypt(pauper, &envelope.to_raw()).await.unwrap_err();

    assert!(err.is_access_denied());
    assert!(!err.is_retryable());

    // The holder still qualifies
    let plaintext = client
        .decrypt(fixture.identity.clone(), &envelope.to_raw())
        .await
        .unwrap();
    assert_eq!(plaintext, b"rich only");
}

#[tokio::test]
async fn test_diverging_condition_fields_fail_before_any_dial() {
    let fixture = TestFixture::new();
    let client = client(&fixture);

    let envelope = client
        .encrypt(fixture.identity.clone(), b"x", fixture.balance_gate(1))
        .await
        .unwrap();
    let dials_after_encrypt = fixture.network.dial_attempts().len();

    let mut raw = envelope.to_raw();
    raw.unified_access_control_conditions =
        Some(fixture.balance_gate(DEFAULT_FUNDING + 1));

    let err = client
        .decrypt(fixture.identity.clone(), &raw)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SealgateError::Envelope(EnvelopeError::ConditionSetMismatch)
    ));
    assert_eq!(fixture.network.dial_attempts().len(), dials_after_encrypt);
}

#[tokio::test]
async fn test_empty_conditions_rejected_before_any_dial() {
    let fixture = TestFixture::new();
    let client = client(&fixture);

    let err = client
        .encrypt(fixture.identity.clone(), b"x", ConditionSet::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SealgateError::Envelope(EnvelopeError::MissingConditions)
    ));
    assert!(fixture.network.dial_attempts().is_empty());
}

#[tokio::test]
async fn test_omitted_fields_take_defaults_on_decrypt() {
    let fixture = TestFixture::new();
    let client = client(&fixture);

    let envelope = client
        .encrypt(fixture.identity.clone(), b"sparse wire form", fixture.balance_gate(1))
        .await
        .unwrap();

    // An older producer would carry only the legacy condition field and
    // no metadata
    let mut raw = envelope.to_raw();
    raw.unified_access_control_conditions = raw.access_control_conditions.take();
    raw.chain = None;
    raw.data_type = None;
    raw.version = None;

    let plaintext = client
        .decrypt(fixture.identity.clone(), &raw)
        .await
        .unwrap();
    assert_eq!(plaintext, b"sparse wire form");
}

/// Identity whose signer never answers, like a wallet prompt nobody
/// clicks.
struct StalledIdentity(AccountAddress);

#[async_trait::async_trait]
impl AccountIdentity for StalledIdentity {
    fn address(&self) -> &AccountAddress {
        &self.0
    }

    async fn sign_message(&self, _message: &str) -> Result<String, CoreError> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_challenge_cancels_instead_of_hanging() {
    let fixture = TestFixture::new();
    let mut config = SealgateConfig::default();
    config.session = SessionConfig {
        sign_timeout: Duration::from_secs(5),
        negotiate_timeout: Duration::from_secs(60),
        ..SessionConfig::default()
    };
    let client = Sealgate::new(fixture.network.clone(), config);

    let stalled = Arc::new(StalledIdentity(fixture.identity.address().clone()));
    let err = client
        .encrypt(stalled, b"x", fixture.balance_gate(1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SealgateError::Session(SessionError::OperationCancelled(_))
    ));
}

#[tokio::test]
async fn test_unregistered_identity_fails_negotiation() {
    let fixture = TestFixture::new();
    let client = client(&fixture);

    let stranger = Arc::new(sealgate_core::KeypairIdentity::from_seed(&[0x77; 32]));
    let err = client
        .encrypt(stranger, b"x", fixture.balance_gate(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SealgateError::Session(SessionError::NegotiationFailed(_))
    ));
}
