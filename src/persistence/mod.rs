//! Key-value persistence
//!
//! Leaderboard, best score and settings all live in a flat string-keyed store.
//! On the web that store is LocalStorage; tests and the native binary use
//! [`MemoryStore`].

use std::collections::HashMap;

use thiserror::Error;

/// Storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage backend available (e.g. LocalStorage disabled)
    #[error("storage unavailable")]
    Unavailable,

    /// The backend rejected a read or write
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Value could not be encoded
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A flat string-keyed, string-valued store
pub trait KeyValueStore {
    /// Read a value (`Ok(None)` if the key was never written)
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage, scoped to the page origin
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Open the window's LocalStorage
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_missing_key() {
        let store = MemoryStore::new();
        assert!(store.get("bestScore").unwrap().is_none());
    }

    #[test]
    fn test_memory_store_overwrite() {
        let mut store = MemoryStore::new();
        store.set("bestScore", "7").unwrap();
        store.set("bestScore", "4").unwrap();
        assert_eq!(store.get("bestScore").unwrap().as_deref(), Some("4"));
    }
}
