//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! The core never reads environment variables itself; binaries do that and hand the result
//! over as a [`CoreConfig`].

use crate::constants::DEFAULT_DATA_FILE;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    data_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig` storing the registry at `data_file`.
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    /// Build a configuration from an optional override, falling back to
    /// [`DEFAULT_DATA_FILE`] in the working directory when the value is absent or blank.
    pub fn from_optional(value: Option<String>) -> Self {
        let data_file = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
        Self::new(data_file)
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_optional_uses_default_when_missing_or_blank() {
        assert_eq!(
            CoreConfig::from_optional(None).data_file(),
            Path::new(DEFAULT_DATA_FILE)
        );
        assert_eq!(
            CoreConfig::from_optional(Some("   ".into())).data_file(),
            Path::new(DEFAULT_DATA_FILE)
        );
    }

    #[test]
    fn from_optional_keeps_trimmed_override() {
        let cfg = CoreConfig::from_optional(Some(" /srv/registry/pacientes.json ".into()));
        assert_eq!(cfg.data_file(), Path::new("/srv/registry/pacientes.json"));
    }
}
