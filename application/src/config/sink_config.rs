//! Sink configuration: what the logger writes and announces.
//!
//! [`SinkConfig`] groups the names the [`Logger`](crate::use_cases::logger::Logger)
//! needs at construction. Which store it writes to is decided by the caller.

use outlog_domain::{SignalName, StorageKey};
use serde::{Deserialize, Serialize};

/// Names used by a logger instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Store entry holding the log buffer.
    pub storage_key: StorageKey,
    /// Name announced for change signals.
    pub signal_name: SignalName,
}

impl SinkConfig {
    pub fn new(storage_key: StorageKey, signal_name: SignalName) -> Self {
        Self {
            storage_key,
            signal_name,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_storage_key(mut self, key: StorageKey) -> Self {
        self.storage_key = key;
        self
    }

    pub fn with_signal_name(mut self, name: SignalName) -> Self {
        self.signal_name = name;
        self
    }
}
