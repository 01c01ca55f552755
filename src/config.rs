//! Persistent key/value settings stored as TOML in the user's config dir.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_DB: &str = "./ironlog.db";
pub const DEFAULT_LOG: &str = "ironlog=warn";

/// Keys the tool reads; anything else is stored but ignored.
pub const KNOWN_KEYS: [&str; 4] = ["db", "user", "role", "log"];

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub map: BTreeMap<String, String>,
}

pub fn default_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join("ironlog").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Load the file at `path`; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = toml::to_string(self)?;
        std::fs::write(path, raw).map_err(io_err)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Resolve one setting: explicit flag, then environment, then file.
    pub fn resolve(
        &self,
        key: &str,
        flag: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| env(&env_var(key)))
            .or_else(|| self.get(key).map(str::to_string))
            .filter(|v| !v.trim().is_empty())
    }
}

/// Environment variable that overrides `key`, e.g. `db` -> `IRONLOG_DB`.
pub fn env_var(key: &str) -> String {
    format!("IRONLOG_{}", key.to_ascii_uppercase())
}
