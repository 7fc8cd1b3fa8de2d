use super::rows::RowSet;
use super::RemoteTable;
use crate::error::{PropzError, Result};
use crate::identity::OwnerId;
use crate::model::{Property, PropertyInput, PropertyPatch};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const TABLE_FILE: &str = "properties.json";

/// A table kept in a JSON file, for running without a hosted service.
///
/// Rows are stored in the service's column shape. Every write reloads the file,
/// applies the change and replaces the file atomically (tmp + rename), so two
/// runs never see a half-written table.
pub struct FileTable {
    root: PathBuf,
}

impl FileTable {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(TABLE_FILE)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(PropzError::Io)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<RowSet> {
        let path = self.path();
        if !path.exists() {
            return Ok(RowSet::new());
        }
        let content = fs::read_to_string(path).map_err(PropzError::Io)?;
        if content.trim().is_empty() {
            return Ok(RowSet::new());
        }
        let rows: RowSet = serde_json::from_str(&content).map_err(PropzError::Serialization)?;
        Ok(rows)
    }

    fn save(&self, rows: &RowSet) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content = serde_json::to_string_pretty(rows).map_err(PropzError::Serialization)?;

        let tmp_file = self.root.join(format!(".properties-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(PropzError::Io)?;
        fs::rename(&tmp_file, self.path()).map_err(PropzError::Io)?;
        Ok(())
    }
}

impl RemoteTable for FileTable {
    fn list(&self, owner: &OwnerId) -> Result<Vec<Property>> {
        self.load()?.list(owner.as_str())
    }

    fn get(&self, id: &str) -> Result<Option<Property>> {
        self.load()?.get(id)
    }

    fn insert(&self, owner: &OwnerId, input: &PropertyInput) -> Result<Property> {
        let mut rows = self.load()?;
        let stored = rows.insert(owner.as_str(), input, Utc::now())?;
        self.save(&rows)?;
        Ok(stored)
    }

    fn update(&self, id: &str, patch: &PropertyPatch) -> Result<()> {
        let mut rows = self.load()?;
        if rows.update(id, patch, Utc::now())? {
            self.save(&rows)?;
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut rows = self.load()?;
        if rows.delete(id) {
            self.save(&rows)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}
