use std::path::{Path, PathBuf};
use std::time::Duration;

use linen_store::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Settings for a tracker session.
///
/// Every field is optional in TOML; missing ones take the defaults below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// JSON file holding the ledger document.
    pub data_path: PathBuf,
    /// Key used by key/value backends.
    pub storage_key: String,
    /// Load the built-in catalogue when nothing usable is stored.
    pub seed_on_empty: bool,
    /// Spacing of synthesized legacy transactions, in seconds.
    pub seed_step_secs: u64,
    /// Rows shown by history listings unless asked otherwise.
    pub history_limit: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("linen-ledger.json"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed_on_empty: true,
            seed_step_secs: 60,
            history_limit: 50,
        }
    }
}

impl TrackerConfig {
    pub fn from_toml_str(input: &str) -> SdkResult<Self> {
        toml::from_str(input).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read a TOML config file.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| SdkError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn seed_step(&self) -> Duration {
        Duration::from_secs(self.seed_step_secs)
    }
}
