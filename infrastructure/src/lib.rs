//! Infrastructure layer for outlog
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigSource, ConfigSourceKind, FileConfig, FileOutputConfig, FileSignalConfig,
    FileStorageConfig,
};
pub use storage::{FileStore, InMemoryStore, StorageSettings, open_store};
