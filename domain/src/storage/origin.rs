//! Origin value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Partition of the key-value store; each origin sees its own entries.
///
/// Origins become file names, so only ASCII alphanumerics, `-`, `_` and
/// `.` are accepted, and a leading `.` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Origin(String);

impl Origin {
    pub const DEFAULT: &'static str = "default";

    pub fn new(origin: impl Into<String>) -> Result<Self, DomainError> {
        let origin = origin.into();
        let valid = !origin.is_empty()
            && !origin.starts_with('.')
            && origin
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(DomainError::InvalidOrigin(origin));
        }
        Ok(Self(origin))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Origin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Origin {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Origin> for String {
    fn from(origin: Origin) -> Self {
        origin.0
    }
}
