//! # Remote Table Layer
//!
//! Listings live in a hosted table. The [`RemoteTable`] trait is the store's only
//! view of it: five calls, keyed by listing id and owner id.
//!
//! ## Contract
//!
//! - `list(owner)`: every row whose owner column equals `owner`, in table order.
//! - `get(id)`: one row, or `None`.
//! - `insert(owner, input)`: stores the row and returns the authoritative record,
//!   with the id and `date_added` the table assigned.
//! - `update(id, patch)`: writes only the patch's set fields (plus `updated_at`).
//! - `delete(id)`: removes the row. Deleting a missing id is not an error.
//!
//! Implementations translate between the model and the table's column names with
//! [`crate::mapping`] and nothing else.
//!
//! ## Implementations
//!
//! - [`rest::RestTable`]: a PostgREST endpoint (the hosted service).
//! - [`file::FileTable`]: a JSON file in the data directory, for use without a service.
//! - [`mem::MemTable`]: in memory, with failure simulation for tests.
//!
//! File and memory tables share [`rows::RowSet`], which keeps rows in the table's
//! column shape so the mapping is exercised the same way the service would.
//!
//! All methods take `&self`: propz is single-threaded and the local tables use
//! `RefCell` for interior mutability, the way the in-memory storage backends do.

use crate::error::Result;
use crate::identity::OwnerId;
use crate::model::{Property, PropertyInput, PropertyPatch};

pub mod file;
pub mod mem;
pub mod rest;
pub mod rows;

pub trait RemoteTable {
    /// All listings owned by `owner`.
    fn list(&self, owner: &OwnerId) -> Result<Vec<Property>>;

    /// A single listing by id.
    fn get(&self, id: &str) -> Result<Option<Property>>;

    /// Insert a listing and return it as stored.
    fn insert(&self, owner: &OwnerId, input: &PropertyInput) -> Result<Property>;

    /// Write the set fields of `patch` to the listing `id`.
    fn update(&self, id: &str, patch: &PropertyPatch) -> Result<()>;

    /// Remove the listing `id`.
    fn delete(&self, id: &str) -> Result<()>;

    /// Human readable location, for `whoami`-style diagnostics.
    fn describe(&self) -> String;
}

impl<T: RemoteTable + ?Sized> RemoteTable for Box<T> {
    fn list(&self, owner: &OwnerId) -> Result<Vec<Property>> {
        (**self).list(owner)
    }

    fn get(&self, id: &str) -> Result<Option<Property>> {
        (**self).get(id)
    }

    fn insert(&self, owner: &OwnerId, input: &PropertyInput) -> Result<Property> {
        (**self).insert(owner, input)
    }

    fn update(&self, id: &str, patch: &PropertyPatch) -> Result<()> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
