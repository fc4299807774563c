//! Web Storage backend for wasm32 frontends

use crate::{KeyValueStore, StorageError};
use web_sys::Storage;

/// `localStorage` adapter.
///
/// The storage object is looked up on every call, so a store that becomes
/// unavailable (private mode, quota, disabled cookies) surfaces as
/// [`StorageError::Unavailable`] instead of a panic.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    pub fn local() -> Self {
        Self
    }

    fn storage(&self) -> Result<Storage, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::unavailable("no window object"))?;
        window
            .local_storage()
            .map_err(|e| StorageError::unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::unavailable("web storage is disabled"))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::unavailable(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::unavailable(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StorageError::unavailable(format!("{e:?}")))
    }
}
