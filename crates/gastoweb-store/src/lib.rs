//! Key/value persistence for gastoweb
//!
//! The expense list and the remembered login email are each kept under one
//! string key. Backends only move opaque strings; decoding is left to the
//! caller so a corrupt value can be recovered from there.

use async_trait::async_trait;
use std::sync::Arc;

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

/// Store reference type
pub type StoreRef = Arc<dyn KeyValueStore>;

/// Trait for key/value backends
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` when it was never written
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Drop the value under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Reject keys that are empty or made only of separators
pub(crate) fn check_key(key: &str) -> Result<(), StoreError> {
    if key.trim().is_empty() || key.chars().all(|c| c == '/' || c == '.') {
        return Err(StoreError::InvalidKey { key: key.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert!(check_key("transport-expenses/v2").is_ok());
        assert!(check_key("lastEmail").is_ok());
        assert!(check_key("").is_err());
        assert!(check_key("  ").is_err());
        assert!(check_key("../").is_err());
    }
}
