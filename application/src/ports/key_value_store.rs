//! Key-value store port
//!
//! Defines the interface to the per-origin key-value store that owns the
//! log buffer. Values are plain strings and the last write wins.

use outlog_domain::StorageKey;
use thiserror::Error;

/// Errors reported by a store adapter
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store content at {location} is corrupt: {reason}")]
    Corrupt { location: String, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Per-origin string store
///
/// Implementations live in the infrastructure layer (in-memory map,
/// JSON file, ...). Every method is synchronous.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &StorageKey) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &StorageKey, value: &str) -> Result<(), StoreError>;

    /// Delete the entry; deleting an absent key is not an error
    fn remove(&self, key: &StorageKey) -> Result<(), StoreError>;

    /// Replace the value under `key` with `apply(current)` and return it.
    ///
    /// Adapters shared between processes override this so that no other
    /// writer can change the entry between the read and the write. The
    /// default is a plain `get` followed by `set`.
    fn update(
        &self,
        key: &StorageKey,
        apply: &mut dyn FnMut(Option<String>) -> String,
    ) -> Result<String, StoreError> {
        let value = apply(self.get(key)?);
        self.set(key, &value)?;
        Ok(value)
    }

    /// Short description for diagnostics (e.g. a file path)
    fn describe(&self) -> String {
        "key-value store".to_string()
    }
}
