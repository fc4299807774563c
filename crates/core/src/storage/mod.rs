//! Durable key-value storage backends
//!
//! A [`KeyValueStore`] plays the role of per-origin browser storage: string
//! keys, string values, and no guarantee that the backend is reachable. Every
//! read goes to the backend so that writes made by another process or tab
//! sharing the same store are observed.

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;

use crate::StorageError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// String key-value storage that survives restarts
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` when unset
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an unset key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Store handle shared between the token store, session and client
pub type SharedStore = Arc<dyn KeyValueStore>;

/// In-process store, used for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::unavailable("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::unavailable("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::unavailable("memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}
