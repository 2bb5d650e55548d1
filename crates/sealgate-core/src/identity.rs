//! The account-identity signing capability.
//!
//! An [`AccountIdentity`] is an address plus the ability to sign an
//! arbitrary message. The core never persists identities and never
//! verifies their signatures; verification is the network's job.

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::types::AccountAddress;

/// The signing capability behind an account.
///
/// Implementations may proxy to an external wallet that prompts for
/// confirmation, so `sign_message` can block for an externally
/// determined duration. Callers wrap it in a timeout.
#[async_trait]
pub trait AccountIdentity: Send + Sync {
    /// The account address this identity controls.
    fn address(&self) -> &AccountAddress;

    /// Sign the exact message text, returning the hex-encoded signature.
    async fn sign_message(&self, message: &str) -> Result<String, CoreError>;
}

/// A local in-process identity backed by an Ed25519 keypair.
///
/// The address is derived as the first 20 bytes of the Blake3 hash of
/// the public key, so distinct keys get distinct addresses.
#[derive(Clone)]
pub struct KeypairIdentity {
    signing_key: SigningKey,
    address: AccountAddress,
}

impl KeypairIdentity {
    /// Generate a new random identity.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_signing_key(SigningKey::generate(&mut rng))
    }

    /// Create a deterministic identity from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let digest = blake3::hash(signing_key.verifying_key().as_bytes());
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&digest.as_bytes()[..20]);
        Self {
            address: AccountAddress::from_bytes(addr),
            signing_key,
        }
    }

    /// The raw public key bytes, for registering with a verifier.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl fmt::Debug for KeypairIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeypairIdentity({})", self.address)
    }
}

#[async_trait]
impl AccountIdentity for KeypairIdentity {
    fn address(&self) -> &AccountAddress {
        &self.address
    }

    async fn sign_message(&self, message: &str) -> Result<String, CoreError> {
        let sig = self.signing_key.sign(message.as_bytes());
        Ok(hex::encode(sig.to_bytes()))
    }
}

/// Wrapper enforcing at-most-one in-flight signature request.
///
/// Underlying signers (hardware wallets, browser extensions) are often
/// not reentrant; this serializes concurrent requests behind a mutex.
pub struct SharedIdentity {
    inner: Arc<dyn AccountIdentity>,
    lock: Mutex<()>,
}

impl SharedIdentity {
    /// Wrap an identity in a request-serializing shell.
    pub fn new(inner: Arc<dyn AccountIdentity>) -> Self {
        Self {
            inner,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl AccountIdentity for SharedIdentity {
    fn address(&self) -> &AccountAddress {
        self.inner.address()
    }

    async fn sign_message(&self, message: &str) -> Result<String, CoreError> {
        let _guard = self.lock.lock().await;
        self.inner.sign_message(message).await
    }
}
