//! The storage capability.
//!
//! The store never touches a concrete key-value backend directly; it is
//! handed a [`Storage`] implementation at construction. The CLI injects
//! [`FileStorage`](crate::persistence::FileStorage); tests inject
//! [`MemoryStorage`].

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::StoreError;

/// A minimal async key-value capability: `read(key)` and `write(key, value)`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the value under `key`, `None` when the key has never been
    /// written.
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(HashMap::from([(key.into(), value.into())])),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();

        assert!(storage.read("missing").await.unwrap().is_none());

        storage.write("key", "value").await.unwrap();
        assert_eq!(storage.read("key").await.unwrap().as_deref(), Some("value"));

        storage.write("key", "replaced").await.unwrap();
        assert_eq!(
            storage.read("key").await.unwrap().as_deref(),
            Some("replaced")
        );
    }

    #[tokio::test]
    async fn test_memory_storage_seeded() {
        let storage = MemoryStorage::with_entry("key", "seed");
        assert_eq!(storage.read("key").await.unwrap().as_deref(), Some("seed"));
    }
}
