//! Storage configuration from TOML (`[storage]` section)

use crate::storage::StorageSettings;
use outlog_domain::{ConfigIssue, ConfigIssueCode, Origin, Severity, StorageBackend, StorageKey};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
///
/// # Example
///
/// ```toml
/// [storage]
/// backend = "file"          # "file" or "memory"
/// origin = "localhost-8080"
/// dir = "~/.local/share/outlog"
/// key = "wasm_output"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Store backend: "file" or "memory"
    pub backend: String,
    /// Origin partition (file name for the file backend)
    pub origin: String,
    /// Directory for the file backend
    pub dir: Option<String>,
    /// Entry holding the log buffer
    pub key: String,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default().as_str().to_string(),
            origin: Origin::DEFAULT.to_string(),
            dir: None,
            key: StorageKey::DEFAULT.to_string(),
        }
    }
}

impl FileStorageConfig {
    /// Parse backend string, falling back to `file` with a warning.
    pub fn parse_backend(&self) -> (StorageBackend, Vec<ConfigIssue>) {
        match self.backend.parse::<StorageBackend>() {
            Ok(backend) => (backend, vec![]),
            Err(_) => {
                let issue = ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "storage.backend".to_string(),
                        value: self.backend.clone(),
                        valid_values: vec!["file".to_string(), "memory".to_string()],
                    },
                    message: format!(
                        "storage.backend: unknown value '{}', falling back to 'file'",
                        self.backend
                    ),
                };
                (StorageBackend::default(), vec![issue])
            }
        }
    }

    /// Parse origin; an invalid origin is an error.
    pub fn parse_origin(&self) -> (Origin, Vec<ConfigIssue>) {
        match Origin::new(self.origin.clone()) {
            Ok(origin) => (origin, vec![]),
            Err(e) => (
                Origin::default(),
                vec![invalid_value("storage.origin", &self.origin, e.to_string())],
            ),
        }
    }

    /// Parse storage key; an invalid key is an error.
    pub fn parse_key(&self) -> (StorageKey, Vec<ConfigIssue>) {
        match StorageKey::new(self.key.clone()) {
            Ok(key) => (key, vec![]),
            Err(e) => (
                StorageKey::default(),
                vec![invalid_value("storage.key", &self.key, e.to_string())],
            ),
        }
    }

    /// Directory with a leading `~` expanded to the home directory.
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        let dir = self.dir.as_deref()?;
        if let Some(rest) = dir.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return Some(home.join(rest));
        }
        Some(PathBuf::from(dir))
    }

    /// Resolve into [`StorageSettings`], collecting every issue found.
    pub fn to_settings(&self) -> (StorageSettings, Vec<ConfigIssue>) {
        let (backend, mut issues) = self.parse_backend();
        let (origin, origin_issues) = self.parse_origin();
        issues.extend(origin_issues);

        if backend == StorageBackend::Memory && self.dir.is_some() {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::IgnoredField {
                    field: "storage.dir".to_string(),
                },
                message: "storage.dir is ignored by the memory backend".to_string(),
            });
        }

        let settings = StorageSettings {
            backend,
            origin,
            dir: self.resolve_dir(),
        };
        (settings, issues)
    }
}

pub(super) fn invalid_value(field: &str, value: &str, reason: String) -> ConfigIssue {
    ConfigIssue {
        severity: Severity::Error,
        code: ConfigIssueCode::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        },
        message: format!("{}: {}", field, reason),
    }
}
