//! Engine configuration loaded from TOML.
//!
//! ```toml
//! data_path = "/var/lib/my-app"
//! strict_mode = false
//! pretty_json = true
//! ```
//!
//! Only the plain settings live here. Runtimes, dispatchers, loggers and
//! custom codecs are code, so they go through [`PersistaBuilder`](crate::PersistaBuilder).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PersistaError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistaConfig {
    /// Root under which the `persista` folder is created.
    pub data_path: PathBuf,

    /// Return failures to the caller instead of logging and falling back.
    #[serde(default)]
    pub strict_mode: bool,

    /// Indent JSON records.
    #[serde(default)]
    pub pretty_json: bool,
}

impl PersistaConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            strict_mode: false,
            pretty_json: false,
        }
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PersistaError::io("reading config", path, e))?;
        Self::from_toml_str(&text).map_err(|source| PersistaError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
