//! LMDB environment configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::LmdbError;

/// Where and how large the LMDB environment is.
///
/// Can be loaded from a TOML file via [`LmdbConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmdbConfig {
    /// Directory holding `data.mdb` and `lock.mdb`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum size of the memory map in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Maximum number of named databases, i.e. storage areas.
    #[serde(default = "default_max_dbs")]
    pub max_dbs: u32,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./xbridge_data")
}

fn default_map_size() -> usize {
    1 << 30
}

fn default_max_dbs() -> u32 {
    16
}

// ── Impl ───────────────────────────────────────────────────────────────

impl LmdbConfig {
    /// Default settings rooted at `data_dir`.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LmdbError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LmdbError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LmdbError> {
        let config: Self = toml::from_str(s).map_err(|e| LmdbError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, LmdbError> {
        toml::to_string_pretty(self).map_err(|e| LmdbError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), LmdbError> {
        if self.max_dbs == 0 {
            return Err(LmdbError::Config("max_dbs must be at least 1".to_string()));
        }
        if self.map_size == 0 {
            return Err(LmdbError::Config("map_size must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl Default for LmdbConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            max_dbs: default_max_dbs(),
        }
    }
}
