//! Subtuber core storage types and utilities

pub mod error;
pub mod storage;
#[cfg(not(target_arch = "wasm32"))]
pub mod state_dir;
pub mod token;

pub use error::{StorageError, StorageStatus};
#[cfg(target_arch = "wasm32")]
pub use storage::browser::BrowserStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::file::FileStore;
pub use storage::{KeyValueStore, MemoryStore, SharedStore};
#[cfg(not(target_arch = "wasm32"))]
pub use state_dir::StateDir;
pub use token::{TOKEN_KEY, TokenStore};
