//! In-memory backend, used by tests and by `--ephemeral` runs

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::{check_key, KeyValueStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `key` already holding `value`
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("lastEmail").await.unwrap(), None);

        store.set("lastEmail", "ana@example.com").await.unwrap();
        assert_eq!(store.get("lastEmail").await.unwrap().as_deref(), Some("ana@example.com"));

        store.set("lastEmail", "beto@example.com").await.unwrap();
        assert_eq!(store.get("lastEmail").await.unwrap().as_deref(), Some("beto@example.com"));

        store.remove("lastEmail").await.unwrap();
        store.remove("lastEmail").await.unwrap();
        assert_eq!(store.get("lastEmail").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_with_entry() {
        let store = MemoryKeyValueStore::with_entry("k", "[]");
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_invalid_key() {
        let store = MemoryKeyValueStore::new();
        assert!(matches!(store.set("", "x").await, Err(StoreError::InvalidKey { .. })));
    }
}
