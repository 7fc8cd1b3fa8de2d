//! # Property Store
//!
//! [`PropertyStore`] is the state container a UI talks to. It owns:
//!
//! - the listing records, in fetch/insertion order,
//! - the current [`PropertyFilters`],
//! - the filtered view, always derived from the two above,
//! - a busy flag and a single error slot.
//!
//! The store is constructed explicitly with a [`RemoteTable`] and the [`OwnerId`]
//! whose rows it manages. There is no global instance.
//!
//! ## Remote-backed Operations
//!
//! `fetch_all`, `add`, `update` and `delete` share one shape: set the busy flag and
//! clear the error slot, call the table, then either apply the result locally or
//! leave local state exactly as it was and put a user-facing message in the error
//! slot. The error is also returned so callers can react (keep a form open, exit
//! non-zero). There is no retry and no queue of failed writes.
//!
//! ## Optimistic Favorite Toggle
//!
//! Toggling a favorite flips the local record first and talks to the table after.
//! The transition is an explicit [`FavoriteToggle`] moving from
//! [`ToggleState::Pending`] to `Confirmed` or `Reverted`:
//!
//! ```text
//! begin_toggle_favorite(id)        // local flip, view recomputed
//!        |
//!   table.update(id, favorite = !previous)
//!        |
//! settle_toggle(toggle, outcome)   // Ok: Confirmed / Err: restore previous, Reverted
//! ```
//!
//! [`PropertyStore::toggle_favorite`] runs the three steps in one call. UIs that
//! render between the flip and the network response drive the steps themselves.
//!
//! ## Filtering
//!
//! `set_filters`, `reset_filters` and `clear_filter` are local and synchronous. After
//! any change to records or criteria, `filtered()` equals
//! `apply_filters(properties(), filters())`.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::error::{PropzError, Result};
use crate::filter::{apply_filters, FilterKey, PropertyFilters};
use crate::identity::{OwnerId, ANONYMOUS_PROPERTY_LIMIT};
use crate::model::{Property, PropertyInput, PropertyPatch, Status};
use crate::remote::RemoteTable;

pub const COMPARE_SLOTS: usize = 3;

pub const LOAD_FAILED: &str = "Failed to load properties. Please try again later.";
pub const ADD_FAILED: &str = "Failed to add property. Please try again later.";
pub const UPDATE_FAILED: &str = "Failed to update property. Please try again later.";
pub const DELETE_FAILED: &str = "Failed to delete property. Please try again later.";
pub const FAVORITE_FAILED: &str = "Failed to update favorite status. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    Pending,
    Confirmed,
    Reverted,
}

/// One in-flight (or settled) favorite toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteToggle {
    id: String,
    previous: bool,
    state: ToggleState,
}

impl FavoriteToggle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The favorite value before the flip.
    pub fn previous(&self) -> bool {
        self.previous
    }

    /// The value sent to the table.
    pub fn requested(&self) -> bool {
        !self.previous
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

/// Dashboard numbers over all records (not just the filtered view).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub favorites: usize,
    pub average_price: f64,
    pub cities: usize,
    pub by_status: Vec<StatusCount>,
}

pub struct PropertyStore<R: RemoteTable> {
    remote: R,
    owner: OwnerId,
    properties: Vec<Property>,
    filtered: Vec<Property>,
    filters: PropertyFilters,
    is_loading: bool,
    error: Option<String>,
}

impl<R: RemoteTable> PropertyStore<R> {
    pub fn new(remote: R, owner: OwnerId) -> Self {
        Self {
            remote,
            owner,
            properties: Vec::new(),
            filtered: Vec::new(),
            filters: PropertyFilters::default(),
            is_loading: false,
            error: None,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn filtered(&self) -> &[Property] {
        &self.filtered
    }

    pub fn filters(&self) -> &PropertyFilters {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn recompute(&mut self) {
        self.filtered = apply_filters(&self.properties, &self.filters);
    }

    /// Runs `op` against the table with the busy flag raised. On failure the
    /// error slot gets `failure`; local state is the caller's to change on success.
    fn remote_op<T>(&mut self, failure: &str, op: impl FnOnce(&R) -> Result<T>) -> Result<T> {
        self.is_loading = true;
        self.error = None;
        let outcome = op(&self.remote);
        self.is_loading = false;
        if let Err(e) = &outcome {
            warn!(error = %e, table = %self.remote.describe(), "{}", failure);
            self.error = Some(failure.to_string());
        }
        outcome
    }

    /// Replace the local records with the owner's rows.
    pub fn fetch_all(&mut self) -> Result<()> {
        let owner = self.owner.clone();
        let rows = self.remote_op(LOAD_FAILED, |remote| remote.list(&owner))?;
        debug!(count = rows.len(), owner = %owner, "fetched properties");
        self.properties = rows;
        self.recompute();
        Ok(())
    }

    /// Insert without validation; the table's stored row is appended and returned.
    pub fn add(&mut self, input: PropertyInput) -> Result<Property> {
        let owner = self.owner.clone();
        let stored = self.remote_op(ADD_FAILED, |remote| remote.insert(&owner, &input))?;
        debug!(id = %stored.id, "added property");
        self.properties.push(stored.clone());
        self.recompute();
        Ok(stored)
    }

    /// Partial update. The local record takes the patched fields without a re-fetch.
    pub fn update(&mut self, id: &str, patch: PropertyPatch) -> Result<()> {
        self.remote_op(UPDATE_FAILED, |remote| remote.update(id, &patch))?;
        if let Some(property) = self.properties.iter_mut().find(|p| p.id == id) {
            patch.apply_to(property);
        }
        debug!(id, "updated property");
        self.recompute();
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.remote_op(DELETE_FAILED, |remote| remote.delete(id))?;
        self.properties.retain(|p| p.id != id);
        debug!(id, "deleted property");
        self.recompute();
        Ok(())
    }

    /// Flip `id` locally and recompute. `None` if the id is not loaded.
    pub fn begin_toggle_favorite(&mut self, id: &str) -> Option<FavoriteToggle> {
        let property = self.properties.iter_mut().find(|p| p.id == id)?;
        let previous = property.favorite;
        property.favorite = !previous;
        self.recompute();
        Some(FavoriteToggle {
            id: id.to_string(),
            previous,
            state: ToggleState::Pending,
        })
    }

    /// Resolve a pending toggle with the table's answer.
    pub fn settle_toggle(&mut self, mut toggle: FavoriteToggle, outcome: Result<()>) -> FavoriteToggle {
        if toggle.state != ToggleState::Pending {
            return toggle;
        }
        match outcome {
            Ok(()) => {
                toggle.state = ToggleState::Confirmed;
            }
            Err(e) => {
                warn!(id = %toggle.id, error = %e, "favorite toggle reverted");
                if let Some(property) = self.properties.iter_mut().find(|p| p.id == toggle.id) {
                    property.favorite = toggle.previous;
                }
                self.recompute();
                self.error = Some(FAVORITE_FAILED.to_string());
                toggle.state = ToggleState::Reverted;
            }
        }
        toggle
    }

    /// Optimistic toggle. The remote error is not returned; it lands in the
    /// error slot and the toggle comes back `Reverted`.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<FavoriteToggle> {
        let toggle = self.begin_toggle_favorite(id)?;
        let outcome = self
            .remote
            .update(&toggle.id, &PropertyPatch::favorite(toggle.requested()));
        Some(self.settle_toggle(toggle, outcome))
    }

    pub fn set_filters(&mut self, partial: PropertyFilters) {
        self.filters.merge(&partial);
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.filters = PropertyFilters::default();
        self.recompute();
    }

    pub fn clear_filter(&mut self, key: FilterKey) {
        self.filters.clear(key);
        self.recompute();
    }

    pub fn get(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<&Property> {
        self.get(id)
            .ok_or_else(|| PropzError::NotFound(id.to_string()))
    }

    /// Up to [`COMPARE_SLOTS`] loaded records, in request order.
    pub fn compare<I: AsRef<str>>(&self, ids: &[I]) -> Vec<&Property> {
        let mut picked: Vec<&Property> = Vec::with_capacity(COMPARE_SLOTS);
        for id in ids {
            if picked.len() == COMPARE_SLOTS {
                break;
            }
            let id = id.as_ref();
            if picked.iter().any(|p| p.id == id) {
                continue;
            }
            if let Some(property) = self.get(id) {
                picked.push(property);
            }
        }
        picked
    }

    pub fn summary(&self) -> Summary {
        let total = self.properties.len();
        let favorites = self.properties.iter().filter(|p| p.favorite).count();
        let average_price = if total == 0 {
            0.0
        } else {
            self.properties.iter().map(|p| p.price).sum::<f64>() / total as f64
        };
        let cities = self
            .properties
            .iter()
            .map(|p| p.city.trim())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .len();
        let by_status = Status::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: self.properties.iter().filter(|p| p.status == status).count(),
            })
            .collect();
        Summary {
            total,
            favorites,
            average_price,
            cities,
            by_status,
        }
    }

    pub fn is_anonymous_limit_reached(&self) -> bool {
        self.owner.is_anonymous() && self.properties.len() >= ANONYMOUS_PROPERTY_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PropertySubtype, PropertyType};
    use crate::remote::mem::MemTable;

    fn owner() -> OwnerId {
        OwnerId::Anonymous("anon-1".into())
    }

    fn input(title: &str, price: f64, bedrooms: u32) -> PropertyInput {
        let mut input = PropertyInput::new(title);
        input.price = price;
        input.bedrooms = bedrooms;
        input.bathrooms = 1.0;
        input.city = "San Francisco".into();
        input
    }

    fn seeded(inputs: &[PropertyInput]) -> PropertyStore<MemTable> {
        let table = MemTable::with_rows(&owner(), inputs).unwrap();
        let mut store = PropertyStore::new(table, owner());
        store.fetch_all().unwrap();
        store
    }

    fn ids(list: &[Property]) -> Vec<&str> {
        list.iter().map(|p| p.id.as_str()).collect()
    }

    fn assert_view_consistent(store: &PropertyStore<MemTable>) {
        assert_eq!(
            store.filtered(),
            apply_filters(store.properties(), store.filters()).as_slice()
        );
    }

    #[test]
    fn new_store_is_empty_and_idle() {
        let store = PropertyStore::new(MemTable::new(), owner());
        assert!(store.properties().is_empty());
        assert!(store.filtered().is_empty());
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
        assert!(!store.filters().is_active());
    }

    #[test]
    fn fetch_all_loads_owner_rows() {
        let store = seeded(&[input("A", 1000.0, 1), input("B", 2000.0, 2)]);
        assert_eq!(store.properties().len(), 2);
        assert_eq!(store.filtered().len(), 2);
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[test]
    fn fetch_failure_keeps_previous_records() {
        let mut store = seeded(&[input("A", 1000.0, 1)]);
        store.remote().set_simulate_failure(true);

        assert!(store.fetch_all().is_err());
        assert_eq!(store.properties().len(), 1);
        assert_eq!(store.error(), Some(LOAD_FAILED));
        assert!(!store.is_loading());
    }

    #[test]
    fn add_appends_stored_record() {
        let mut store = seeded(&[input("A", 1000.0, 1)]);
        let mut new = input("B", 2500.0, 2);
        new.bathrooms = 1.5;
        new.latitude = 37.7749;
        new.longitude = -122.4194;
        new.property_subtype = Some(PropertySubtype::Condo);
        new.contact_email = Some("agent@example.com".into());
        new.amenities = vec!["Gym".into(), "Gym".into()];
        new.positive_features = vec!["Light".into()];
        let added = store.add(new.clone()).unwrap();

        assert!(!added.id.is_empty());
        assert_eq!(
            store.get(&added.id),
            Some(&crate::model::Property::from_input(
                added.id.clone(),
                added.date_added,
                new
            ))
        );
        assert_eq!(store.properties().last().unwrap().id, added.id);
        assert_eq!(store.properties().len(), 2);
        assert_eq!(store.remote().row_count(), 2);
        assert_view_consistent(&store);
    }

    #[test]
    fn add_does_not_validate() {
        let mut store = seeded(&[]);
        let mut bad = PropertyInput::new("");
        bad.price = -5.0;
        assert!(store.add(bad).is_ok());
    }

    #[test]
    fn add_failure_leaves_state_and_sets_error() {
        let mut store = seeded(&[input("A", 1000.0, 1)]);
        store.remote().set_simulate_failure(true);

        let before = store.properties().to_vec();
        assert!(store.add(input("B", 1.0, 0)).is_err());
        assert_eq!(store.properties(), before.as_slice());
        assert_eq!(store.error(), Some(ADD_FAILED));
        assert!(!store.is_loading());
    }

    #[test]
    fn next_success_clears_error() {
        let mut store = seeded(&[]);
        store.remote().set_simulate_failure(true);
        assert!(store.add(input("A", 1.0, 0)).is_err());
        assert!(store.error().is_some());

        store.remote().set_simulate_failure(false);
        store.add(input("A", 1.0, 0)).unwrap();
        assert_eq!(store.error(), None);
    }

    #[test]
    fn update_merges_patch_locally() {
        let mut store = seeded(&[input("A", 1000.0, 1)]);
        let id = store.properties()[0].id.clone();
        let calls = store.remote().calls();

        let patch = PropertyPatch {
            price: Some(1200.0),
            status: Some(Status::Applied),
            ..Default::default()
        };
        store.update(&id, patch).unwrap();

        let p = store.get(&id).unwrap();
        assert_eq!(p.price, 1200.0);
        assert_eq!(p.status, Status::Applied);
        assert_eq!(p.title, "A");
        assert_eq!(store.remote().calls(), calls + 1, "no re-fetch after update");
    }

    #[test]
    fn update_failure_is_propagated() {
        let mut store = seeded(&[input("A", 1000.0, 1)]);
        let id = store.properties()[0].id.clone();
        store.remote().set_simulate_failure(true);

        assert!(store.update(&id, PropertyPatch::status(Status::Viewed)).is_err());
        assert_eq!(store.get(&id).unwrap().status, Status::Interested);
        assert_eq!(store.error(), Some(UPDATE_FAILED));
    }

    #[test]
    fn delete_removes_locally() {
        let mut store = seeded(&[input("A", 1.0, 0), input("B", 2.0, 0)]);
        let id = store.properties()[0].id.clone();

        store.delete(&id).unwrap();
        assert!(store.get(&id).is_none());
        assert_eq!(store.properties().len(), 1);
        assert_view_consistent(&store);

        // already gone
        store.delete(&id).unwrap();
        assert_eq!(store.properties().len(), 1);
    }

    #[test]
    fn delete_failure_keeps_record() {
        let mut store = seeded(&[input("A", 1.0, 0)]);
        let id = store.properties()[0].id.clone();
        store.remote().set_simulate_failure(true);

        assert!(store.delete(&id).is_err());
        assert!(store.get(&id).is_some());
        assert_eq!(store.error(), Some(DELETE_FAILED));
    }

    #[test]
    fn toggle_favorite_confirms() {
        let mut store = seeded(&[input("A", 1.0, 0)]);
        let id = store.properties()[0].id.clone();

        let toggle = store.toggle_favorite(&id).unwrap();
        assert_eq!(toggle.state(), ToggleState::Confirmed);
        assert!(!toggle.previous());
        assert!(store.get(&id).unwrap().favorite);
        assert!(store.remote().get(&id).unwrap().unwrap().favorite);
    }

    #[test]
    fn toggle_twice_round_trips() {
        let mut store = seeded(&[input("A", 1.0, 0)]);
        let id = store.properties()[0].id.clone();
        store.toggle_favorite(&id).unwrap();
        store.toggle_favorite(&id).unwrap();
        assert!(!store.get(&id).unwrap().favorite);
    }

    #[test]
    fn toggle_failure_reverts_and_reports() {
        let mut store = seeded(&[input("A", 1.0, 0)]);
        let id = store.properties()[0].id.clone();
        store.set_filters(PropertyFilters::new().with_favorite(false));
        store.remote().set_simulate_failure(true);

        let toggle = store.toggle_favorite(&id).unwrap();
        assert_eq!(toggle.state(), ToggleState::Reverted);
        assert!(!store.get(&id).unwrap().favorite);
        assert_eq!(ids(store.filtered()), vec![id.as_str()]);
        assert_eq!(store.error(), Some(FAVORITE_FAILED));
    }

    #[test]
    fn pending_toggle_is_visible_before_settling() {
        let mut store = seeded(&[input("A", 1.0, 0), input("B", 2.0, 0)]);
        let id = store.properties()[1].id.clone();
        store.set_filters(PropertyFilters::new().with_favorite(true));
        assert!(store.filtered().is_empty());

        let toggle = store.begin_toggle_favorite(&id).unwrap();
        assert_eq!(toggle.state(), ToggleState::Pending);
        assert_eq!(ids(store.filtered()), vec![id.as_str()]);

        let settled = store.settle_toggle(toggle, Err(PropzError::Store("offline".into())));
        assert_eq!(settled.state(), ToggleState::Reverted);
        assert!(store.filtered().is_empty());
    }

    #[test]
    fn settled_toggle_is_final() {
        let mut store = seeded(&[input("A", 1.0, 0)]);
        let id = store.properties()[0].id.clone();
        let toggle = store.begin_toggle_favorite(&id).unwrap();
        let confirmed = store.settle_toggle(toggle, Ok(()));

        let again = store.settle_toggle(confirmed.clone(), Err(PropzError::Store("late".into())));
        assert_eq!(again, confirmed);
        assert!(store.get(&id).unwrap().favorite);
        assert_eq!(store.error(), None);
    }

    #[test]
    fn toggle_unknown_id_does_nothing() {
        let mut store = seeded(&[input("A", 1.0, 0)]);
        let calls = store.remote().calls();
        assert!(store.toggle_favorite("missing").is_none());
        assert_eq!(store.remote().calls(), calls);
    }

    #[test]
    fn filters_merge_and_reset() {
        let mut store = seeded(&[
            input("A", 1000.0, 1),
            input("B", 2000.0, 2),
            input("C", 3000.0, 3),
        ]);
        let calls = store.remote().calls();

        store.set_filters(PropertyFilters::new().with_min_bedrooms(2));
        assert_eq!(store.filtered().len(), 2);
        store.set_filters(PropertyFilters::new().with_price_range(None, Some(2000.0)));
        assert_eq!(store.filtered().len(), 1);
        assert_eq!(store.filters().min_bedrooms, Some(2));
        assert_view_consistent(&store);

        store.clear_filter(FilterKey::MinBedrooms);
        assert_eq!(store.filtered().len(), 2);

        store.reset_filters();
        assert_eq!(store.filtered(), store.properties());
        assert_eq!(store.remote().calls(), calls, "filtering is local");
    }

    #[test]
    fn view_follows_mutations_under_filters() {
        let mut store = seeded(&[input("A", 1000.0, 1)]);
        store.set_filters(PropertyFilters::new().with_property_type(PropertyType::Buy));
        assert!(store.filtered().is_empty());

        let mut buy = input("B", 500000.0, 3);
        buy.property_type = PropertyType::Buy;
        buy.property_subtype = Some(PropertySubtype::House);
        let added = store.add(buy).unwrap();
        assert_eq!(ids(store.filtered()), vec![added.id.as_str()]);

        store
            .update(&added.id, PropertyPatch {
                property_type: Some(PropertyType::Rent),
                ..Default::default()
            })
            .unwrap();
        assert!(store.filtered().is_empty());
        assert_view_consistent(&store);
    }

    #[test]
    fn get_and_require() {
        let store = seeded(&[input("A", 1.0, 0)]);
        let id = store.properties()[0].id.clone();
        assert!(store.get(&id).is_some());
        assert!(store.get("nope").is_none());
        assert!(matches!(store.require("nope"), Err(PropzError::NotFound(_))));
    }

    #[test]
    fn compare_keeps_order_skips_unknown_and_duplicates() {
        let store = seeded(&[
            input("A", 1.0, 0),
            input("B", 2.0, 0),
            input("C", 3.0, 0),
            input("D", 4.0, 0),
        ]);
        let all: Vec<String> = store.properties().iter().map(|p| p.id.clone()).collect();

        let requested = [
            all[2].as_str(),
            "ghost",
            all[0].as_str(),
            all[2].as_str(),
            all[3].as_str(),
            all[1].as_str(),
        ];
        let picked = store.compare(&requested);
        let titles: Vec<&str> = picked.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "D"]);
    }

    #[test]
    fn summary_counts() {
        let mut oakland = input("C", 3000.0, 2);
        oakland.city = "Oakland".into();
        oakland.status = Status::Viewed;
        let mut store = seeded(&[input("A", 1000.0, 1), input("B", 2000.0, 2), oakland]);
        let id = store.properties()[0].id.clone();
        store.toggle_favorite(&id).unwrap();

        let summary = store.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.favorites, 1);
        assert_eq!(summary.average_price, 2000.0);
        assert_eq!(summary.cities, 2);
        let viewed = summary
            .by_status
            .iter()
            .find(|c| c.status == Status::Viewed)
            .unwrap();
        assert_eq!(viewed.count, 1);
    }

    #[test]
    fn empty_summary_has_zero_average() {
        let store = PropertyStore::new(MemTable::new(), owner());
        let summary = store.summary();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_price, 0.0);
        assert_eq!(summary.by_status.len(), Status::ALL.len());
    }

    #[test]
    fn anonymous_limit() {
        let inputs: Vec<PropertyInput> = (0..ANONYMOUS_PROPERTY_LIMIT)
            .map(|i| input(&format!("P{}", i), 1.0, 0))
            .collect();
        let store = seeded(&inputs[..ANONYMOUS_PROPERTY_LIMIT - 1]);
        assert!(!store.is_anonymous_limit_reached());

        let store = seeded(&inputs);
        assert!(store.is_anonymous_limit_reached());

        let user = OwnerId::User("user-1".into());
        let table = MemTable::with_rows(&user, &inputs).unwrap();
        let mut store = PropertyStore::new(table, user);
        store.fetch_all().unwrap();
        assert!(!store.is_anonymous_limit_reached());
    }
}
