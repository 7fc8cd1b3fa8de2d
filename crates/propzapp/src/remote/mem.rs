use super::rows::RowSet;
use super::RemoteTable;
use crate::error::{PropzError, Result};
use crate::identity::OwnerId;
use crate::model::{Property, PropertyInput, PropertyPatch};
use chrono::Utc;
use std::cell::{Cell, RefCell};

/// In-memory table for testing.
///
/// Uses `RefCell` for interior mutability since propz is single-threaded.
/// Failures can be switched on to exercise the store's error paths; while
/// failing, no call touches the rows.
#[derive(Default)]
pub struct MemTable {
    rows: RefCell<RowSet>,
    simulate_failure: Cell<bool>,
    calls: Cell<usize>,
}

impl MemTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows directly, bypassing failure simulation.
    pub fn with_rows(owner: &OwnerId, inputs: &[PropertyInput]) -> Result<Self> {
        let table = Self::new();
        {
            let mut rows = table.rows.borrow_mut();
            for input in inputs {
                rows.insert(owner.as_str(), input, Utc::now())?;
            }
        }
        Ok(table)
    }

    /// Enable failure simulation for testing error handling.
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.set(simulate);
    }

    /// Number of calls that reached the table, failed or not.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    fn check(&self) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        if self.simulate_failure.get() {
            return Err(PropzError::Store("Simulated network error".to_string()));
        }
        Ok(())
    }
}

impl RemoteTable for MemTable {
    fn list(&self, owner: &OwnerId) -> Result<Vec<Property>> {
        self.check()?;
        self.rows.borrow().list(owner.as_str())
    }

    fn get(&self, id: &str) -> Result<Option<Property>> {
        self.check()?;
        self.rows.borrow().get(id)
    }

    fn insert(&self, owner: &OwnerId, input: &PropertyInput) -> Result<Property> {
        self.check()?;
        self.rows
            .borrow_mut()
            .insert(owner.as_str(), input, Utc::now())
    }

    fn update(&self, id: &str, patch: &PropertyPatch) -> Result<()> {
        self.check()?;
        self.rows.borrow_mut().update(id, patch, Utc::now())?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.check()?;
        self.rows.borrow_mut().delete(id);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory://properties".to_string()
    }
}
