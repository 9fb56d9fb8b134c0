//! # User Configuration
//!
//! Optional, persisted configuration for skelly: default project host and
//! owner, the set of named skeleton repositories to search, and user
//! values layered over skeleton values. Loaded from
//! `<config-dir>/skelly/config.yaml`; a missing file simply yields the
//! defaults. Command-line flags always win over file values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gitignore::NO_GITIGNORE;
use crate::license::NO_LICENSE;
use crate::template::Values;

/// Directory name used under the platform config and cache directories.
pub const APP_DIR: &str = "skelly";

/// File name of the user configuration.
pub const CONFIG_FILE: &str = "config.yaml";

/// Name of the repository configured when none is.
pub const DEFAULT_REPOSITORY_NAME: &str = "default";

/// Locator of the stock skeleton repository.
pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/skelly-dev/skeletons";

/// Default project host.
pub const DEFAULT_PROJECT_HOST: &str = "github.com";

/// Schema of the user configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults applied to new projects, overridable per invocation.
    pub project: ProjectDefaults,
    /// Named skeleton repositories, searched in name order.
    pub repositories: BTreeMap<String, String>,
    /// User values merged over skeleton values.
    pub values: Values,
}

/// Project-related defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    /// Git host domain, e.g. `github.com`.
    pub host: String,
    /// Repository owner, e.g. a GitHub user or organization.
    pub owner: String,
    /// Default license key, or `none`.
    pub license: String,
    /// Default gitignore query, or `none`.
    pub gitignore: String,
}

impl Config {
    /// Load configuration from an explicit path. The file must exist.
    pub fn load(path: &Path) -> Result<Config> {
        let raw = std::fs::read_to_string(path).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        let mut config: Config =
            serde_yaml::from_str(&raw).map_err(|err| Error::Config {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        config.apply_defaults();
        Ok(config)
    }

    /// Load the configuration from the default location; a missing file
    /// yields the defaults.
    pub fn load_default() -> Result<Config> {
        let path = default_config_path();
        if !path.exists() {
            let mut config = Config::default();
            config.apply_defaults();
            return Ok(config);
        }

        Self::load(&path)
    }

    /// Fill unset fields with their defaults and normalize the `none`
    /// sentinels to empty.
    pub fn apply_defaults(&mut self) {
        if self.repositories.is_empty() {
            self.repositories.insert(
                DEFAULT_REPOSITORY_NAME.to_string(),
                DEFAULT_REPOSITORY_URL.to_string(),
            );
        }

        if self.project.host.is_empty() {
            self.project.host = DEFAULT_PROJECT_HOST.to_string();
        }

        if self.project.license == NO_LICENSE {
            self.project.license.clear();
        }

        if self.project.gitignore == NO_GITIGNORE {
            self.project.gitignore.clear();
        }
    }
}

/// Default location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Root directory of the on-disk repository cache.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("repositories")
}
