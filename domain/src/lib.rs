//! Domain layer for outlog
//!
//! This crate contains the value objects of the output sink.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## LogBuffer
//!
//! One accumulated text log. Every emitted line is followed by a newline
//! separator; lines are only appended, and the whole buffer can be cleared.
//!
//! ## ChangeSignal
//!
//! A payload-free notice delivered to listeners after each mutation of the
//! buffer. Listeners read the buffer themselves if they need its content.

pub mod buffer;
pub mod config;
pub mod core;
pub mod signal;
pub mod storage;

// Re-export commonly used types
pub use buffer::{BufferState, LINE_SEPARATOR, LogBuffer};
pub use config::{
    OutputFormat, StorageBackend,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use core::error::DomainError;
pub use signal::{ChangeSignal, SignalName};
pub use storage::{Origin, StorageKey};
