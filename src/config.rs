//! Configuration loaded from `config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculator::{DEFAULT_UNDO_LIMIT, ERROR_RESET_DELAY};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds the error text stays on the display.
    pub error_reset_ms: u64,
    /// Snapshots kept for undo.
    pub undo_limit: usize,
    pub storage: StorageConfig,
    /// Remote history store; history stays local when absent.
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage file; defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_table() -> String {
    "calculations".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_reset_ms: ERROR_RESET_DELAY.as_millis() as u64,
            undo_limit: DEFAULT_UNDO_LIMIT,
            storage: StorageConfig::default(),
            remote: None,
        }
    }
}

impl Config {
    /// `<config dir>/calcdesk/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("calcdesk").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; an unparsable one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), remote = config.remote.is_some(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn error_reset_delay(&self) -> Duration {
        Duration::from_millis(self.error_reset_ms)
    }

    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage
            .path
            .clone()
            .or_else(crate::storage::LocalStorage::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.error_reset_ms, 1500);
        assert_eq!(config.undo_limit, DEFAULT_UNDO_LIMIT);
        assert!(config.remote.is_none());
        assert_eq!(config.error_reset_delay(), ERROR_RESET_DELAY);
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
            error_reset_ms = 800
            undo_limit = 20

            [storage]
            path = "/tmp/calcdesk.json"

            [remote]
            url = "https://example.test"
            api_key = "anon"
            "#,
        )
        .unwrap();

        assert_eq!(config.error_reset_ms, 800);
        assert_eq!(config.undo_limit, 20);
        assert_eq!(config.storage_path(), Some(PathBuf::from("/tmp/calcdesk.json")));

        let remote = config.remote.unwrap();
        assert_eq!(remote.url, "https://example.test");
        assert_eq!(remote.table, "calculations");
        assert_eq!(remote.timeout_secs, 10);
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_remote_requires_url() {
        assert!(Config::parse("[remote]\napi_key = \"x\"\n").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "undo_limit = \"many\"").unwrap();
        assert!(matches!(Config::load(Some(path.as_path())), Err(Error::Config(_))));
    }
}
