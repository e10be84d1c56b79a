//! Key-value store adapters.
//!
//! - [`InMemoryStore`]: process-local map
//! - [`FileStore`]: one JSON file per origin
//!
//! [`open_store`] picks the adapter described by [`StorageSettings`].

mod file_store;
mod memory;

pub use file_store::FileStore;
pub use memory::InMemoryStore;

use outlog_application::{KeyValueStore, StoreError};
use outlog_domain::{Origin, StorageBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Resolved storage selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub origin: Origin,
    /// Directory for file stores; `None` uses [`FileStore::default_dir`].
    pub dir: Option<PathBuf>,
}

/// Open the store described by `settings`.
pub fn open_store(settings: &StorageSettings) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match settings.backend {
        StorageBackend::Memory => {
            info!("Using in-memory store; the log is discarded on exit");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageBackend::File => {
            let dir = match &settings.dir {
                Some(dir) => dir.clone(),
                None => FileStore::default_dir().ok_or_else(|| {
                    StoreError::Unavailable("no data directory for this platform".to_string())
                })?,
            };
            let store = FileStore::open(&dir, &settings.origin)?;
            info!("Using file store at {}", store.path().display());
            Ok(Arc::new(store))
        }
    }
}
