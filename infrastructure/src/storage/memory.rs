//! Process-local key-value store.

use outlog_application::{KeyValueStore, StoreError};
use outlog_domain::StorageKey;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Map-backed store that lives as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StorageKey, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &StorageKey) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &StorageKey, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.clone(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }

    fn update(
        &self,
        key: &StorageKey,
        apply: &mut dyn FnMut(Option<String>) -> String,
    ) -> Result<String, StoreError> {
        let mut entries = self.lock();
        let value = apply(entries.get(key).cloned());
        entries.insert(key.clone(), value.clone());
        Ok(value)
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}
