//! # Sealgate Store
//!
//! The content-addressed blob-store boundary. An access envelope is
//! the only artifact that crosses it: serialized to JSON, tagged, and
//! retrieved later by content identifier. Real backends (gateway
//! uploaders, pinning services) implement [`BlobStore`]; tests use
//! [`MemoryBlobStore`].

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryBlobStore;
pub use traits::{BlobStore, ContentId, Tag};
