//! Application layer for outlog
//!
//! This crate contains the logger use case, the signal hub, port
//! definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod signal;
pub mod use_cases;

// Re-export commonly used types
pub use config::SinkConfig;
pub use ports::{
    change_listener::ChangeListener,
    key_value_store::{KeyValueStore, StoreError},
};
pub use signal::{SignalHub, Subscription, SubscriptionId};
pub use use_cases::logger::{BufferSnapshot, Logger, LoggerError};
