//! Application-level configuration.
//!
//! - [`SinkConfig`]: naming of the store entry and the change signal

pub mod sink_config;

pub use sink_config::SinkConfig;
