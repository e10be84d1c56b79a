//! Signal configuration from TOML (`[signal]` section)

use super::storage::invalid_value;
use outlog_domain::{ConfigIssue, SignalName};
use serde::{Deserialize, Serialize};

/// Raw signal configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSignalConfig {
    /// Name announced for change signals
    pub name: String,
}

impl Default for FileSignalConfig {
    fn default() -> Self {
        Self {
            name: SignalName::DEFAULT.to_string(),
        }
    }
}

impl FileSignalConfig {
    pub fn parse_name(&self) -> (SignalName, Vec<ConfigIssue>) {
        match SignalName::new(self.name.clone()) {
            Ok(name) => (name, vec![]),
            Err(e) => (
                SignalName::default(),
                vec![invalid_value("signal.name", &self.name, e.to_string())],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_falls_back_with_error() {
        let config = FileSignalConfig {
            name: "log changed".to_string(),
        };
        let (name, issues) = config.parse_name();
        assert_eq!(name, SignalName::default());
        assert!(issues[0].is_error());
    }
}
