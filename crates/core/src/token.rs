//! Bearer token persistence

use crate::{SharedStore, StorageError, StorageStatus};
use tracing::{debug, warn};

/// Durable key holding the bearer token
pub const TOKEN_KEY: &str = "subtuber_token";

/// Reads and writes the session token in durable storage.
///
/// Nothing is cached; [`TokenStore::get`] hits the backing store on every
/// call so a token written or cleared elsewhere is picked up immediately.
#[derive(Clone)]
pub struct TokenStore {
    store: SharedStore,
    key: String,
}

impl TokenStore {
    /// Token store under the default [`TOKEN_KEY`]
    pub fn new(store: SharedStore) -> Self {
        Self::with_key(store, TOKEN_KEY)
    }

    pub fn with_key(store: SharedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Current token, `None` when unset or when storage cannot be read
    pub fn get(&self) -> Option<String> {
        match self.try_get() {
            Ok(token) => token,
            Err(err) => {
                debug!(key = %self.key, "Treating unreadable token as absent: {err}");
                None
            }
        }
    }

    /// Current token, surfacing storage faults
    pub fn try_get(&self) -> Result<Option<String>, StorageError> {
        Ok(self.store.get(&self.key)?.filter(|token| !token.is_empty()))
    }

    /// Overwrite the token, or remove it when given `None` or an empty token
    pub fn set(&self, token: Option<&str>) -> StorageStatus {
        let result = match token.filter(|token| !token.is_empty()) {
            Some(token) => self.store.set(&self.key, token),
            None => self.store.remove(&self.key),
        };
        if let Err(err) = &result {
            warn!(key = %self.key, "Failed to persist token: {err}");
        }
        result.into()
    }

    pub fn clear(&self) -> StorageStatus {
        self.set(None)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("key", &self.key).finish()
    }
}
