//! An in-process threshold-network fake.
//!
//! [`MemoryNetwork`] stands in for the whole distributed decryption
//! service: it issues challenges, verifies signed statements against
//! registered keys, grants session credentials, seals payloads with a
//! network-held symmetric key, and evaluates access conditions against
//! a chain oracle before releasing plaintext. Reachability is
//! configurable per network name so endpoint fallback is observable.

use async_trait::async_trait;
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Nonce,
};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use rand::RngCore;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use sealgate_core::{
    Ability, AccountAddress, AccountIdentity, Challenge, ChainOracle, ContentHash, KeypairIdentity,
    NetworkId,
    ScopeRequest, SessionCredential, DERIVED_VIA_WALLET,
};
use sealgate_envelope::{AccessEnvelope, ConditionSet};
use sealgate_session::{
    ChallengeHandler, Dialer, NodeConnection, SealedPayload, SessionError,
};

/// How long issued sessions stay valid (milliseconds).
const SESSION_TTL_MS: i64 = 10 * 60 * 1000;

struct NetworkState {
    oracle: Arc<dyn ChainOracle>,
    key: [u8; 32],
    reachable: RwLock<HashSet<NetworkId>>,
    accounts: RwLock<HashMap<AccountAddress, [u8; 32]>>,
    sessions: RwLock<HashMap<String, SessionCredential>>,
    dial_attempts: Mutex<Vec<NetworkId>>,
    handshakes: Mutex<Vec<NetworkId>>,
    challenges_issued: Mutex<usize>,
}

/// The fake network. Clone-cheap handle; also the [`Dialer`].
#[derive(Clone)]
pub struct MemoryNetwork {
    state: Arc<NetworkState>,
}

impl MemoryNetwork {
    /// Create a network evaluating conditions against `oracle`.
    ///
    /// No instance names are reachable until marked so.
    pub fn new(oracle: Arc<dyn ChainOracle>) -> Self {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self {
            state: Arc::new(NetworkState {
                oracle,
                key,
                reachable: RwLock::new(HashSet::new()),
                accounts: RwLock::new(HashMap::new()),
                sessions: RwLock::new(HashMap::new()),
                dial_attempts: Mutex::new(Vec::new()),
                handshakes: Mutex::new(Vec::new()),
                challenges_issued: Mutex::new(0),
            }),
        }
    }

    /// Mark a network instance name reachable or not.
    pub fn set_reachable(&self, network: &NetworkId, reachable: bool) {
        let mut set = self.state.reachable.write().expect("lock poisoned");
        if reachable {
            set.insert(network.clone());
        } else {
            set.remove(network);
        }
    }

    /// Register an identity's verifying key so its statements pass
    /// verification.
    pub fn register_identity(&self, identity: &KeypairIdentity) {
        self.state
            .accounts
            .write()
            .expect("lock poisoned")
            .insert(identity.address().clone(), identity.public_key_bytes());
    }

    /// Every dial attempt, in order.
    pub fn dial_attempts(&self) -> Vec<NetworkId> {
        self.state.dial_attempts.lock().expect("lock poisoned").clone()
    }

    /// Every successful handshake, in order.
    pub fn handshakes(&self) -> Vec<NetworkId> {
        self.state.handshakes.lock().expect("lock poisoned").clone()
    }

    /// Total challenges issued across all negotiations.
    pub fn challenges_issued(&self) -> usize {
        *self.state.challenges_issued.lock().expect("lock poisoned")
    }
}

#[async_trait]
impl Dialer for MemoryNetwork {
    async fn dial(
        &self,
        network: &NetworkId,
    ) -> Result<Box<dyn NodeConnection>, SessionError> {
        self.state
            .dial_attempts
            .lock()
            .expect("lock poisoned")
            .push(network.clone());

        let reachable = self
            .state
            .reachable
            .read()
            .expect("lock poisoned")
            .contains(network);
        if !reachable {
            return Err(SessionError::ConnectFailed(format!(
                "{network}: connection refused"
            )));
        }

        self.state
            .handshakes
            .lock()
            .expect("lock poisoned")
            .push(network.clone());

        Ok(Box::new(MemoryConnection {
            network: network.clone(),
            state: Arc::clone(&self.state),
        }))
    }
}

/// One live connection into the fake network.
struct MemoryConnection {
    network: NetworkId,
    state: Arc<NetworkState>,
}

impl MemoryConnection {
    fn lookup_session(&self, credential: &SessionCredential) -> Result<(), SessionError> {
        let sessions = self.state.sessions.read().expect("lock poisoned");
        let known = sessions
            .get(&credential.session_id)
            .ok_or_else(|| SessionError::Service("session not recognized".to_string()))?;

        if known != credential {
            return Err(SessionError::Service(
                "credential does not match issued session".to_string(),
            ));
        }
        if !credential.is_valid_at(now_millis()) {
            return Err(SessionError::Service("session expired".to_string()));
        }
        Ok(())
    }

    /// Associated data binding a ciphertext to the envelope fields the
    /// network requires at decryption time.
    fn binding_aad(
        conditions: &ConditionSet,
        hash: &ContentHash,
        chain: &str,
    ) -> Result<Vec<u8>, SessionError> {
        let mut aad = serde_json::to_vec(conditions)
            .map_err(|e| SessionError::Service(format!("condition encoding: {e}")))?;
        aad.extend_from_slice(hash.as_bytes());
        aad.extend_from_slice(chain.as_bytes());
        Ok(aad)
    }

    async fn evaluate_conditions(
        &self,
        conditions: &ConditionSet,
        requester: &AccountAddress,
    ) -> Result<bool, SessionError> {
        for condition in conditions {
            if !condition.is_balance_query() {
                return Err(SessionError::Service(format!(
                    "unsupported condition method: {}",
                    condition.method
                )));
            }
            let balance = self
                .state
                .oracle
                .balance_of(requester)
                .await
                .map_err(|e| SessionError::Service(e.to_string()))?;
            let holds = condition
                .return_value_test
                .check_numeric(balance)
                .map_err(|e| SessionError::Service(e.to_string()))?;
            if !holds {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl NodeConnection for MemoryConnection {
    fn network(&self) -> &NetworkId {
        &self.network
    }

    async fn negotiate_session(
        &self,
        _chain: &str,
        requests: &[ScopeRequest],
        handler: &dyn ChallengeHandler,
    ) -> Result<SessionCredential, SessionError> {
        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);
        let challenge = Challenge {
            uri: format!("sealgate:session:{}", hex::encode(nonce)),
            expiration: "2099-01-01T00:00:00Z".to_string(),
        };
        *self.state.challenges_issued.lock().expect("lock poisoned") += 1;

        let statement = handler.on_challenge(challenge.clone()).await?;

        if statement.derived_via != DERIVED_VIA_WALLET {
            return Err(SessionError::NegotiationFailed(format!(
                "unsupported derivation: {}",
                statement.derived_via
            )));
        }
        if !statement.signed_message.contains(&challenge.uri) {
            return Err(SessionError::NegotiationFailed(
                "statement does not answer the issued challenge".to_string(),
            ));
        }

        let key_bytes = self
            .state
            .accounts
            .read()
            .expect("lock poisoned")
            .get(&statement.address)
            .copied()
            .ok_or_else(|| {
                SessionError::NegotiationFailed(format!(
                    "unknown account {}",
                    statement.address
                ))
            })?;

        let key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| SessionError::NegotiationFailed(e.to_string()))?;
        let sig_bytes: [u8; 64] = hex::decode(&statement.sig)
            .ok()
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                SessionError::NegotiationFailed("malformed signature".to_string())
            })?;
        key.verify(
            statement.signed_message.as_bytes(),
            &Signature::from_bytes(&sig_bytes),
        )
        .map_err(|_| {
            SessionError::NegotiationFailed("signature verification failed".to_string())
        })?;

        let mut session_bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut session_bytes);
        let issued_at = now_millis();
        let credential = SessionCredential {
            session_id: hex::encode(session_bytes),
            delegations: requests.to_vec(),
            proof: statement,
            issued_at,
            expires_at: issued_at + SESSION_TTL_MS,
        };

        self.state
            .sessions
            .write()
            .expect("lock poisoned")
            .insert(credential.session_id.clone(), credential.clone());

        Ok(credential)
    }

    async fn encrypt(
        &self,
        credential: &SessionCredential,
        plaintext: &[u8],
        conditions: &ConditionSet,
        chain: &str,
    ) -> Result<SealedPayload, SessionError> {
        self.lookup_session(credential)?;

        let hash = ContentHash::digest(plaintext);
        let aad = Self::binding_aad(conditions, &hash, chain)?;

        let cipher = ChaCha20Poly1305::new_from_slice(&self.state.key)
            .map_err(|e| SessionError::Service(e.to_string()))?;
        let mut nonce = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut nonce);
        let sealed = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: &aad,
                },
            )
            .map_err(|e| SessionError::Service(e.to_string()))?;

        let mut wire = nonce.to_vec();
        wire.extend_from_slice(&sealed);

        Ok(SealedPayload {
            ciphertext: hex::encode(wire),
            data_to_encrypt_hash: hash,
        })
    }

    async fn decrypt(
        &self,
        credential: &SessionCredential,
        envelope: &AccessEnvelope,
    ) -> Result<Vec<u8>, SessionError> {
        self.lookup_session(credential)?;

        let resource = format!("acc://{}", envelope.data_to_encrypt_hash.to_hex());
        if !credential.covers(&resource, Ability::ConditionDecryption) {
            return Err(SessionError::Service(
                "credential scope does not cover this resource".to_string(),
            ));
        }

        let satisfied = self
            .evaluate_conditions(&envelope.conditions, &credential.proof.address)
            .await?;
        if !satisfied {
            return Err(SessionError::AccessDenied);
        }

        let wire = hex::decode(&envelope.ciphertext)
            .map_err(|_| SessionError::Service("ciphertext is not hex".to_string()))?;
        if wire.len() < 12 {
            return Err(SessionError::Service("ciphertext too short".to_string()));
        }
        let (nonce, sealed) = wire.split_at(12);

        let aad = Self::binding_aad(
            &envelope.conditions,
            &envelope.data_to_encrypt_hash,
            &envelope.chain,
        )?;
        let cipher = ChaCha20Poly1305::new_from_slice(&self.state.key)
            .map_err(|e| SessionError::Service(e.to_string()))?;

        cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: &aad,
                },
            )
            .map_err(|_| {
                SessionError::Service("ciphertext authentication failed".to_string())
            })
    }
}

fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
