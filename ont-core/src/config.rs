//! Tool configuration: file locations for the dataset, the CSV export and the
//! backup directory.
//!
//! Resolution order, lowest to highest priority:
//! - built-in defaults (`data/onts.json`, `data/csvjson.json`, `runtime/backups`)
//! - YAML file (`--config`, else `$ONT_TOOLS_CONFIG`, else `./ont-tools.yaml`)
//! - `ONT_DATASET`, `ONT_SOURCE`, `ONT_BACKUP_DIR` environment variables
//! - command-line flags (applied by the binaries)

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_ENV: &str = "ONT_TOOLS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "ont-tools.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Relative paths below resolve against this directory
    pub base_dir: PathBuf,
    pub dataset_file: PathBuf,
    pub source_file: PathBuf,
    pub backup_dir: PathBuf,
}

/// Path overrides coming from the command line.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub base_dir: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            dataset_file: PathBuf::from("data/onts.json"),
            source_file: PathBuf::from("data/csvjson.json"),
            backup_dir: PathBuf::from("runtime/backups"),
        }
    }
}

impl ToolsConfig {
    /// Picks the config file location: explicit path, then env, then default.
    pub fn config_path(explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => std::env::var(CONFIG_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Reads a YAML config. `Ok(None)` when the file does not exist or is empty.
    pub fn load_from(path: &Path) -> Result<Option<Self>, StoreError> {
        let txt = match fs::read_to_string(path) {
            Ok(txt) => txt,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        if txt.trim().is_empty() {
            return Ok(None);
        }
        serde_yaml::from_str(&txt)
            .map(Some)
            .map_err(|e| StoreError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Loads the config and applies environment overrides. Never fails:
    /// an unusable file is reported and the defaults are used instead.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = Self::config_path(explicit);
        let mut config = match Self::load_from(&path) {
            Ok(Some(config)) => {
                info!(path = %path.display(), "config loaded");
                config
            }
            Ok(None) => {
                info!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "config invalid, using defaults");
                Self::default()
            }
        };
        config.apply_env_with(|key| std::env::var(key).ok());
        config
    }

    /// Applies `ONT_DATASET`, `ONT_SOURCE` and `ONT_BACKUP_DIR` from `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty("ONT_DATASET") {
            self.dataset_file = PathBuf::from(v);
        }
        if let Some(v) = non_empty("ONT_SOURCE") {
            self.source_file = PathBuf::from(v);
        }
        if let Some(v) = non_empty("ONT_BACKUP_DIR") {
            self.backup_dir = PathBuf::from(v);
        }
    }

    /// Command-line flags, applied last.
    pub fn apply_overrides(&mut self, overrides: PathOverrides) {
        if let Some(base_dir) = overrides.base_dir {
            self.base_dir = base_dir;
        }
        if let Some(dataset) = overrides.dataset {
            self.dataset_file = dataset;
        }
        if let Some(source) = overrides.source {
            self.source_file = source;
        }
        if let Some(backup_dir) = overrides.backup_dir {
            self.backup_dir = backup_dir;
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.resolve(&self.dataset_file)
    }

    pub fn source_path(&self) -> PathBuf {
        self.resolve(&self.source_file)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.resolve(&self.backup_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_deployment_layout() {
        let config = ToolsConfig::default();
        assert_eq!(config.dataset_path(), PathBuf::from("./data/onts.json"));
        assert_eq!(config.source_path(), PathBuf::from("./data/csvjson.json"));
        assert_eq!(config.backup_path(), PathBuf::from("./runtime/backups"));
    }

    #[test]
    fn yaml_overrides_only_given_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ont-tools.yaml");
        fs::write(&path, "base_dir: /srv/monitor\nbackup_dir: /var/backups/onts\n").unwrap();

        let config = ToolsConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(config.dataset_path(), PathBuf::from("/srv/monitor/data/onts.json"));
        assert_eq!(config.backup_path(), PathBuf::from("/var/backups/onts"));
    }

    #[test]
    fn missing_or_empty_file_means_defaults() {
        let dir = tempdir().unwrap();
        assert!(ToolsConfig::load_from(&dir.path().join("absent.yaml")).unwrap().is_none());

        let empty = dir.path().join("empty.yaml");
        fs::write(&empty, "  \n").unwrap();
        assert!(ToolsConfig::load_from(&empty).unwrap().is_none());
    }

    #[test]
    fn invalid_yaml_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "dataset_file: [unclosed").unwrap();
        assert!(matches!(
            ToolsConfig::load_from(&path),
            Err(StoreError::Config { .. })
        ));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [("ONT_DATASET", "/tmp/x.json"), ("ONT_SOURCE", "")]
            .into_iter()
            .collect();
        let mut config = ToolsConfig::default();
        config.apply_env_with(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.dataset_file, PathBuf::from("/tmp/x.json"));
        assert_eq!(config.source_file, PathBuf::from("data/csvjson.json"));
    }

    #[test]
    fn flags_win_over_file_values() {
        let mut config = ToolsConfig {
            dataset_file: PathBuf::from("from-yaml.json"),
            ..ToolsConfig::default()
        };
        config.apply_overrides(PathOverrides {
            base_dir: Some(PathBuf::from("/opt/ont")),
            dataset: Some(PathBuf::from("custom/onts.json")),
            ..PathOverrides::default()
        });
        assert_eq!(config.dataset_path(), PathBuf::from("/opt/ont/custom/onts.json"));
        assert_eq!(config.source_path(), PathBuf::from("/opt/ont/data/csvjson.json"));
    }
}
