//! Storage backend selection

use serde::{Deserialize, Serialize};

/// Which key-value store holds the log buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Per-origin JSON file that survives restarts (default)
    #[default]
    File,
    /// Process-local map, discarded on exit
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::File => "file",
            StorageBackend::Memory => "memory",
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, StorageBackend::File)
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}
