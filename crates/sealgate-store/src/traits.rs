//! BlobStore trait: the abstract interface to content-addressed storage.
//!
//! The core only produces bytes and tags; upload mechanics (funding,
//! gateways, receipts) belong to the backing service and stay outside
//! this boundary.

use async_trait::async_trait;
use std::fmt;

use crate::error::Result;

/// Identifier an object is retrieved by: a hash of its content, not a
/// path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a backend-issued identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One metadata tag attached to an uploaded object.
///
/// Tags are an ordered list; backends may index on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Async interface to a content-addressed blob store.
///
/// # Design Notes
///
/// - **Content addressing**: `put` returns an identifier derived from
///   the object's bytes; storing identical bytes twice is idempotent.
/// - **Opaque payloads**: the store never inspects what it holds; the
///   serialized envelope is just bytes to it.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes with ordered metadata tags, returning the content
    /// identifier.
    async fn put(&self, bytes: &[u8], tags: &[Tag]) -> Result<ContentId>;

    /// Retrieve the bytes stored under an identifier.
    async fn get(&self, id: &ContentId) -> Result<Vec<u8>>;
}
