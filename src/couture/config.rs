//! # Configuration
//!
//! Couture configuration is managed by [`confique`], which layers compiled
//! defaults, a TOML file and environment variables.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `COUTURE_DATA_DIR`, `COUTURE_LOG`,
//!    `COUTURE_LOG_FORMAT`, `COUTURE_MAX_DEPTH`.
//! 2. **Vault config**: `couture.toml` inside the data directory.
//! 3. **Compiled defaults**: `#[config(default = ...)]` below.
//!
//! The data directory itself comes from `COUTURE_DATA_DIR` or, when unset,
//! the platform data directory (via `directories`).
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | platform data dir | Where the `nodes`, `anchors` and `links` collections live |
//! | `log_level` | `warn` | `tracing` filter directive |
//! | `log_format` | `text` | `text` or `json` |
//! | `max_depth` | `256` | Deepest subtree a move or delete will walk |

use crate::error::{Result, VaultError};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "couture.toml";
pub const DATA_DIR_ENV: &str = "COUTURE_DATA_DIR";

/// Configuration for a vault, stored in `couture.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Directory holding the vault's collections.
    #[config(env = "COUTURE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. "warn" or "couture=debug".
    #[config(env = "COUTURE_LOG", default = "warn")]
    pub log_level: String,

    /// Log output format: "text" or "json".
    #[config(env = "COUTURE_LOG_FORMAT", default = "text")]
    pub log_format: String,

    /// Maximum subtree depth walked by cascading moves and deletes.
    #[config(env = "COUTURE_MAX_DEPTH", default = 256)]
    pub max_depth: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "warn".to_string(),
            log_format: "text".to_string(),
            max_depth: crate::api::DEFAULT_MAX_DEPTH,
        }
    }
}

fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "couture", "couture").map(|dirs| dirs.data_dir().to_path_buf())
}

impl VaultConfig {
    /// Loads the effective configuration for this process.
    pub fn load() -> Result<Self> {
        let dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .or_else(default_data_dir);
        Self::load_from(dir.as_deref())
    }

    /// Loads with `couture.toml` read from `dir`. A missing file is fine.
    pub fn load_from(dir: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(dir) = dir {
            builder = builder.file(dir.join(CONFIG_FILENAME));
        }
        let config = builder
            .load()
            .map_err(|e| VaultError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(VaultError::Config("max_depth must be at least 1".to_string()));
        }
        if self.log_format != "text" && self.log_format != "json" {
            return Err(VaultError::Config(format!(
                "invalid log format '{}' (must be 'text' or 'json')",
                self.log_format
            )));
        }
        Ok(())
    }

    /// The configured data directory, or the platform default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        self.data_dir
            .clone()
            .or_else(default_data_dir)
            .ok_or_else(|| VaultError::Config("could not determine a data directory".to_string()))
    }

    /// A commented `couture.toml` listing every setting with its default.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = VaultConfig::default();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, "text");
        assert_eq!(config.max_depth, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "log_format = \"json\"\nmax_depth = 12\n",
        )
        .unwrap();
        let config = VaultConfig::load_from(Some(dir.path())).unwrap();
        assert_eq!(config.log_format, "json");
        assert_eq!(config.max_depth, 12);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::load_from(Some(dir.path())).unwrap();
        assert_eq!(config.max_depth, VaultConfig::default().max_depth);
    }

    #[test]
    fn test_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "log_format = \"xml\"\n").unwrap();
        let err = VaultConfig::load_from(Some(dir.path())).unwrap_err();
        assert!(matches!(err, VaultError::Config(_)));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = VaultConfig {
            data_dir: Some(PathBuf::from("/tmp/vault")),
            ..Default::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/vault"));
    }

    #[test]
    fn test_template_lists_settings() {
        let template = VaultConfig::template();
        assert!(template.contains("max_depth"));
        assert!(template.contains("log_format"));
    }
}
