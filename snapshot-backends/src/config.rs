// SPDX-License-Identifier: GPL-3.0-only

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snapshot_types::{ExecutionEnvironment, StorageLayout};

use crate::error::{BackendError, Result};

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "SNAPSHOT_BACKENDS_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Root of `storage-pools/` and `snapshots/`
    pub state_dir: PathBuf,
    /// Name or absolute path of the btrfs tool
    pub btrfs_binary: String,
    /// Overrides environment detection when set
    pub restricted: Option<bool>,
    pub log_level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("/var/lib/instances"),
            btrfs_binary: "btrfs".to_string(),
            restricted: None,
            log_level: "info".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|error| BackendError::Config {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

        Self::parse(&raw, path)
    }

    /// Parse TOML read from `origin`
    pub fn parse(raw: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|error| BackendError::Config {
            path: origin.to_path_buf(),
            reason: error.to_string(),
        })?;

        config.validate(origin)?;
        Ok(config)
    }

    pub fn validate(&self, origin: &Path) -> Result<()> {
        let invalid = |reason: &str| BackendError::Config {
            path: origin.to_path_buf(),
            reason: reason.to_string(),
        };

        if self.btrfs_binary.trim().is_empty() {
            return Err(invalid("btrfs_binary must not be empty"));
        }

        if !self.state_dir.is_absolute() {
            return Err(invalid("state_dir must be an absolute path"));
        }

        Ok(())
    }

    pub fn layout(&self) -> StorageLayout {
        StorageLayout::new(&self.state_dir)
    }

    pub fn environment(&self) -> ExecutionEnvironment {
        match self.restricted {
            Some(true) => ExecutionEnvironment::restricted(),
            Some(false) => ExecutionEnvironment::unrestricted(),
            None => snapshot_sys::env::detect(),
        }
    }
}
