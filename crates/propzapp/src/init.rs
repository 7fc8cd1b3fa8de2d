//! # Session Setup
//!
//! [`initialize`] turns the environment into a ready [`PropzContext`]:
//!
//! 1. **Directories**: config and data directories come from the OS (via the
//!    `directories` crate). `PROPZ_CONFIG` overrides the config file and
//!    `PROPZ_DATA_DIR` the data directory, which is how tests isolate state.
//! 2. **Config**: [`PropzConfig::load`] (env > file > defaults).
//! 3. **Identity**: the configured user, else the persisted anonymous id.
//! 4. **Table**: [`RestTable`] when an endpoint is configured, else a
//!    [`FileTable`] in the data directory.
//!
//! Nothing is fetched here. The first API call loads the owner's listings.

use directories::ProjectDirs;
use std::path::PathBuf;

use crate::api::PropzApi;
use crate::config::{default_config_path, PropzConfig};
use crate::error::{PropzError, Result};
use crate::identity::{resolve_identity, OwnerId};
use crate::remote::file::FileTable;
use crate::remote::rest::RestTable;
use crate::remote::RemoteTable;
use crate::store::PropertyStore;

pub type DynTable = Box<dyn RemoteTable>;

pub struct PropzContext {
    pub api: PropzApi<DynTable>,
    pub config: PropzConfig,
    pub data_dir: PathBuf,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "propz", "propz")
}

/// `$PROPZ_DATA_DIR`, else the OS data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PROPZ_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| PropzError::Config("could not determine a data directory".to_string()))
}

pub fn config_path() -> PathBuf {
    default_config_path(project_dirs().map(|dirs| dirs.config_dir().to_path_buf()))
}

/// The table a config points at.
pub fn open_table(config: &PropzConfig, data_dir: PathBuf) -> Result<DynTable> {
    match config.endpoint() {
        Some(endpoint) => {
            let table = RestTable::new(
                endpoint,
                config.table(),
                config.api_key.clone(),
                config.timeout(),
            )?;
            tracing::debug!(url = %table.table_url(), "using remote table");
            Ok(Box::new(table))
        }
        None => {
            let table = FileTable::new(data_dir);
            tracing::debug!(path = %table.path().display(), "using local table");
            Ok(Box::new(table))
        }
    }
}

/// Build a context from an explicit config and data directory.
pub fn initialize_with(config: PropzConfig, data_dir: PathBuf) -> Result<PropzContext> {
    let owner: OwnerId = resolve_identity(&config, &data_dir).owner_id()?;
    let table = open_table(&config, data_dir.clone())?;
    let api = PropzApi::new(PropertyStore::new(table, owner));
    Ok(PropzContext {
        api,
        config,
        data_dir,
    })
}

pub fn initialize() -> Result<PropzContext> {
    let config = PropzConfig::load(&config_path())?;
    initialize_with(config, data_dir()?)
}
