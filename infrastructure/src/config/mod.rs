//! Configuration file loading for outlog
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `OUTLOG_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./outlog.toml` or `./.outlog.toml`
//! 4. Global: `~/.config/outlog/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileOutputConfig, FileSignalConfig, FileStorageConfig};
pub use loader::{ConfigLoader, ConfigSource, ConfigSourceKind};
