//! # Configuration
//!
//! Propz configuration is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables, and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `PROPZ_ENDPOINT`, `PROPZ_API_KEY`, ...
//! 2. **Config file**: `propz.toml` (`$PROPZ_CONFIG`, or the OS config directory).
//! 3. **Compiled defaults**: unset keys fall back in their accessors
//!    ([`PropzConfig::table`], [`PropzConfig::timeout`]).
//!
//! A missing config file is not an error.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `endpoint` | `PROPZ_ENDPOINT` | none | Hosted table service URL; unset means a local file table |
//! | `api_key` | `PROPZ_API_KEY` | none | Service key |
//! | `table` | `PROPZ_TABLE` | `properties` | Table name |
//! | `user_id` | `PROPZ_USER_ID` | none | Signed-in user; unset means anonymous |
//! | `timeout_secs` | `PROPZ_TIMEOUT_SECS` | `30` | HTTP timeout |

use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PropzError, Result};

pub const CONFIG_FILE: &str = "propz.toml";
const DEFAULT_TABLE: &str = "properties";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Config, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PropzConfig {
    /// Base URL of the hosted table service (e.g. "https://xyz.supabase.co").
    #[config(env = "PROPZ_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Service key sent with every request.
    #[config(env = "PROPZ_API_KEY")]
    pub api_key: Option<String>,

    /// Table holding the listings. When absent, "properties".
    #[config(env = "PROPZ_TABLE")]
    pub table: Option<String>,

    /// Signed-in user id. When absent, an anonymous id is used.
    #[config(env = "PROPZ_USER_ID")]
    pub user_id: Option<String>,

    /// HTTP timeout in seconds. When absent, 30.
    #[config(env = "PROPZ_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl PropzConfig {
    /// Load from the environment, then `path` (if it exists), then defaults.
    pub fn load(path: &Path) -> Result<Self> {
        PropzConfig::builder()
            .env()
            .file(path)
            .load()
            .map_err(|e| PropzError::Config(e.to_string()))
    }

    /// The endpoint, if one is configured and not blank.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn table(&self) -> &str {
        self.table
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TABLE)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1))
    }

    /// Sample file for `propz config gen`-style bootstrapping.
    pub fn template() -> String {
        confique::toml::template::<PropzConfig>(confique::toml::FormatOptions::default())
    }
}

/// `$PROPZ_CONFIG`, else `<os config dir>/propz.toml`.
pub fn default_config_path(config_dir: Option<PathBuf>) -> PathBuf {
    if let Ok(path) = std::env::var("PROPZ_CONFIG") {
        return PathBuf::from(path);
    }
    config_dir
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE)
}
