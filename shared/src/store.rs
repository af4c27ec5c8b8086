//! Blob store capability used by the override service.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Result;

/// Opaque key-value store holding UTF-8 text blobs.
///
/// Implementations must give read-after-write consistency for a single key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch a value, `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous one.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// List every key in the store.
    async fn list(&self) -> Result<Vec<String>>;

    /// Remove a key. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// In-process store for local runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.blobs.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.blobs.read().await.keys().cloned().collect())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.blobs.write().await.remove(key);
        Ok(())
    }
}
