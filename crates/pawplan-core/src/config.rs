//! Tracker configuration, loaded from a small TOML file.
//!
//! Every field has a serde default so an empty file (or no file at all)
//! yields a working configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "pawplan";
const DATABASE_FILE_NAME: &str = "pawplan.sqlite3";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Explicit database path; platform data dir when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

const fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl TrackerConfig {
    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parse config file {}", path.display()))
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// The database path to open: explicit override or platform default.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(default_database_path)
    }
}

/// Platform default database path (`<data dir>/pawplan/pawplan.sqlite3`).
#[must_use]
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
        .join(DATABASE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::{TrackerConfig, default_busy_timeout_ms};
    use std::path::PathBuf;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: TrackerConfig = toml::from_str("").expect("parse empty config");
        assert!(config.store.path.is_none());
        assert_eq!(config.store.busy_timeout_ms, default_busy_timeout_ms());
    }

    #[test]
    fn explicit_path_overrides_the_default() {
        let config: TrackerConfig = toml::from_str(
            r#"
            [store]
            path = "/tmp/elsewhere.sqlite3"
            "#,
        )
        .expect("parse config");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/elsewhere.sqlite3")
        );
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = TrackerConfig::load_or_default(&dir.path().join("absent.toml"))
            .expect("load_or_default");
        assert!(config.store.path.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "store = 3").expect("write config");
        assert!(TrackerConfig::load(&path).is_err());
    }
}
