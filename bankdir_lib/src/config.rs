//! Directory configuration: optional TOML file, then environment overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DirectoryError;

pub const DEFAULT_DATABASE_PATH: &str = "bankdir.sqlite";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

pub const ENV_DATABASE_PATH: &str = "BANKDIR_DB";
pub const ENV_BIND_ADDR: &str = "BANKDIR_BIND";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub database_path: PathBuf,
    pub bind_addr: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl DirectoryConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, DirectoryError> {
        toml::from_str(content).map_err(|e| DirectoryError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, DirectoryError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DirectoryError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    /// Blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(path) = get(ENV_DATABASE_PATH) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(bind) = get(ENV_BIND_ADDR) {
            self.bind_addr = bind;
        }
        self
    }

    /// Defaults, then the file at `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, DirectoryError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(|key| std::env::var(key).ok());
        tracing::debug!(
            database = %config.database_path.display(),
            bind = %config.bind_addr,
            "loaded configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        let config = DirectoryConfig::from_toml_str("").unwrap();
        assert_eq!(config, DirectoryConfig::default());
    }

    #[test]
    fn toml_values_are_read() {
        let config = DirectoryConfig::from_toml_str(
            "database_path = \"/var/lib/bankdir/dir.sqlite\"\nbind_addr = \"0.0.0.0:9000\"\n",
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/bankdir/dir.sqlite"));
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = DirectoryConfig::from_toml_str("bind_addr = ").unwrap_err();
        assert!(matches!(err, DirectoryError::Config(_)));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let config = DirectoryConfig::from_toml_str("bind_addr = \"0.0.0.0:9000\"")
            .unwrap()
            .with_overrides(|key| match key {
                ENV_BIND_ADDR => Some("127.0.0.1:7000".to_string()),
                ENV_DATABASE_PATH => Some("  ".to_string()),
                _ => None,
            });
        assert_eq!(config.bind_addr, "127.0.0.1:7000");
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = DirectoryConfig::from_file(Path::new("/nonexistent/bankdir.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bankdir.toml"));
    }
}
