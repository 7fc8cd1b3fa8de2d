use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::mapping::{
    input_to_row, patch_to_row, row_to_property, Row, DATE_ADDED_COLUMN, ID_COLUMN, OWNER_COLUMN,
};
use crate::model::{Property, PropertyInput, PropertyPatch};

/// Rows in the table's column shape, in insertion order.
///
/// This is the table logic shared by the local backends; it plays the part the
/// hosted service plays for [`super::rest::RestTable`]: it assigns ids and
/// timestamps, scopes reads by owner and stamps `updated_at` on writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowSet {
    rows: Vec<Row>,
}

impl RowSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get(ID_COLUMN).and_then(Value::as_str) == Some(id))
    }

    pub fn list(&self, owner: &str) -> Result<Vec<Property>> {
        self.rows
            .iter()
            .filter(|row| row.get(OWNER_COLUMN).and_then(Value::as_str) == Some(owner))
            .map(row_to_property)
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<Option<Property>> {
        self.position(id)
            .map(|i| row_to_property(&self.rows[i]))
            .transpose()
    }

    pub fn insert(
        &mut self,
        owner: &str,
        input: &PropertyInput,
        now: DateTime<Utc>,
    ) -> Result<Property> {
        let mut row = input_to_row(owner, input)?;
        row.insert(
            ID_COLUMN.to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );
        row.insert(
            DATE_ADDED_COLUMN.to_string(),
            Value::String(now.to_rfc3339()),
        );
        let stored = row_to_property(&row)?;
        self.rows.push(row);
        Ok(stored)
    }

    /// Returns whether a row matched. PostgREST reports success either way.
    pub fn update(&mut self, id: &str, patch: &PropertyPatch, now: DateTime<Utc>) -> Result<bool> {
        let changes = patch_to_row(patch, now)?;
        let Some(i) = self.position(id) else {
            return Ok(false);
        };
        self.rows[i].extend(changes);
        Ok(true)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) => {
                self.rows.remove(i);
                true
            }
            None => false,
        }
    }

    /// Raw access for tests that need to look at the column shape.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}
