//! In-memory content-addressed store for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::traits::{BlobStore, ContentId, Tag};

/// A content-addressed store backed by a map.
///
/// Identifiers are the Blake3 hex of the stored bytes, so equal
/// payloads collapse to one object. Tags are kept for inspection in
/// tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, (Vec<u8>, Vec<Tag>)>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tags recorded for an object, if present.
    pub async fn tags_of(&self, id: &ContentId) -> Option<Vec<Tag>> {
        self.objects
            .read()
            .await
            .get(id.as_str())
            .map(|(_, tags)| tags.clone())
    }

    /// Number of distinct objects held.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, bytes: &[u8], tags: &[Tag]) -> Result<ContentId> {
        let id = hex::encode(blake3::hash(bytes).as_bytes());
        self.objects
            .write()
            .await
            .insert(id.clone(), (bytes.to_vec(), tags.to_vec()));
        Ok(ContentId::new(id))
    }

    async fn get(&self, id: &ContentId) -> Result<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(id.as_str())
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryBlobStore::new();
        let id = store.put(b"payload", &[]).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_content_addressing_is_idempotent() {
        let store = MemoryBlobStore::new();
        let a = store.put(b"same", &[]).await.unwrap();
        let b = store.put(b"same", &[]).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_object() {
        let store = MemoryBlobStore::new();
        let err = store.get(&ContentId::new("missing")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_tags_preserved_in_order() {
        let store = MemoryBlobStore::new();
        let tags = vec![
            Tag::new("Content-Type", "application/json"),
            Tag::new("App-Name", "sealgate"),
        ];
        let id = store.put(b"tagged", &tags).await.unwrap();
        assert_eq!(store.tags_of(&id).await.unwrap(), tags);
    }
}
