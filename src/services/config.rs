//! User configuration (`~/.marketview/config.json`)
//!
//! Every field is optional. A missing file means defaults.

use crate::services::booking_views::FeeSelection;
use crate::services::resolver::OverrideTable;
use crate::types::{MarketError, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketConfig {
    /// Snapshot directory; `~/.marketview/data` when unset
    pub data_dir: Option<PathBuf>,
    /// Replaces the built-in override table entirely when present
    pub overrides: OverrideTable,
    pub fee_selection: FeeSelection,
}

impl MarketConfig {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`; a missing file yields defaults, a malformed one is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| MarketError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(
            path = %path.display(),
            overrides_version = config.overrides.version,
            "loaded config"
        );
        Ok(config)
    }

    /// `~/.marketview/config.json`
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.json"))
    }

    /// Configured data directory, or `~/.marketview/data`
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::home_dir()?.join("data")),
        }
    }

    fn home_dir() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| MarketError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".marketview"))
    }
}
