//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! String fields are parsed into domain value objects on demand, and every
//! problem is reported as a [`ConfigIssue`].

mod output;
mod signal;
mod storage;

pub use output::FileOutputConfig;
pub use signal::FileSignalConfig;
pub use storage::FileStorageConfig;

use crate::storage::StorageSettings;
use outlog_application::SinkConfig;
use outlog_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Store selection and entry key
    pub storage: FileStorageConfig,
    /// Change signal settings
    pub signal: FileSignalConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.storage.to_settings().1);
        issues.extend(self.storage.parse_key().1);
        issues.extend(self.signal.parse_name().1);
        issues
    }

    /// Names for the logger; invalid values fall back to defaults.
    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig::new(self.storage.parse_key().0, self.signal.parse_name().0)
    }

    /// Store selection; invalid values fall back to defaults.
    pub fn storage_settings(&self) -> StorageSettings {
        self.storage.to_settings().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlog_domain::{OutputFormat, StorageBackend};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[storage]
backend = "memory"
origin = "localhost-8080"
key = "diag"

[signal]
name = "diag_changed"

[output]
format = "json"
color = false
numbered = true
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());

        let sink = config.sink_config();
        assert_eq!(sink.storage_key.as_str(), "diag");
        assert_eq!(sink.signal_name.as_str(), "diag_changed");

        let settings = config.storage_settings();
        assert_eq!(settings.backend, StorageBackend::Memory);
        assert_eq!(settings.origin.as_str(), "localhost-8080");

        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(config.output.numbered);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: FileConfig = toml::from_str("[storage]\norigin = \"site\"\n").unwrap();
        assert_eq!(config.storage.origin, "site");
        assert_eq!(config.storage.key, "wasm_output");
        assert_eq!(config.storage.backend, "file");
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let toml_str = r#"
[storage]
backend = "cloud"
origin = "a/b"
key = ""

[signal]
name = "two words"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 4);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 3);
        assert_eq!(config.sink_config(), SinkConfig::default());
    }
}
