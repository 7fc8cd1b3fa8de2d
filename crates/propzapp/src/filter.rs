//! # Filtering Listings
//!
//! [`PropertyFilters`] is a value object of optional constraints. An unset field
//! (`None`) imposes nothing; a set field must hold for a listing to pass.
//!
//! ## Semantics
//!
//! - All set constraints are ANDed.
//! - Price bounds are inclusive on both ends; bedrooms/bathrooms are minimums.
//! - Status, favorite, type and subtype are exact matches. A listing with no
//!   subtype never matches a required subtype.
//! - Inverted ranges (`min_price > max_price`) are not rejected; they just match
//!   nothing.
//!
//! [`apply_filters`] is stable: the output is a subsequence of the input in the
//! same order. Running it twice with the same criteria changes nothing.
//!
//! ## Text Search
//!
//! [`search`] is the free-text box of the listing page, applied on top of the
//! criteria: case-insensitive substring match over title, description, address,
//! city and notes.

use serde::{Deserialize, Serialize};

use crate::model::{Property, PropertySubtype, PropertyType, Status};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilters {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<f64>,
    pub status: Option<Status>,
    pub favorite: Option<bool>,
    pub property_type: Option<PropertyType>,
    pub property_subtype: Option<PropertySubtype>,
}

/// Names a single constraint, for clearing it on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    MinPrice,
    MaxPrice,
    MinBedrooms,
    MinBathrooms,
    Status,
    Favorite,
    PropertyType,
    PropertySubtype,
}

impl PropertyFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_min_bedrooms(mut self, n: u32) -> Self {
        self.min_bedrooms = Some(n);
        self
    }

    pub fn with_min_bathrooms(mut self, n: f64) -> Self {
        self.min_bathrooms = Some(n);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }

    pub fn with_property_type(mut self, kind: PropertyType) -> Self {
        self.property_type = Some(kind);
        self
    }

    pub fn with_property_subtype(mut self, subtype: PropertySubtype) -> Self {
        self.property_subtype = Some(subtype);
        self
    }

    /// Shallow merge: set fields of `other` overwrite, unset ones leave `self` alone.
    pub fn merge(&mut self, other: &PropertyFilters) {
        if other.min_price.is_some() {
            self.min_price = other.min_price;
        }
        if other.max_price.is_some() {
            self.max_price = other.max_price;
        }
        if other.min_bedrooms.is_some() {
            self.min_bedrooms = other.min_bedrooms;
        }
        if other.min_bathrooms.is_some() {
            self.min_bathrooms = other.min_bathrooms;
        }
        if other.status.is_some() {
            self.status = other.status;
        }
        if other.favorite.is_some() {
            self.favorite = other.favorite;
        }
        if other.property_type.is_some() {
            self.property_type = other.property_type;
        }
        if other.property_subtype.is_some() {
            self.property_subtype = other.property_subtype;
        }
    }

    pub fn clear(&mut self, key: FilterKey) {
        match key {
            FilterKey::MinPrice => self.min_price = None,
            FilterKey::MaxPrice => self.max_price = None,
            FilterKey::MinBedrooms => self.min_bedrooms = None,
            FilterKey::MinBathrooms => self.min_bathrooms = None,
            FilterKey::Status => self.status = None,
            FilterKey::Favorite => self.favorite = None,
            FilterKey::PropertyType => self.property_type = None,
            FilterKey::PropertySubtype => self.property_subtype = None,
        }
    }

    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    pub fn matches(&self, p: &Property) -> bool {
        if self.min_price.is_some_and(|min| p.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| p.price > max) {
            return false;
        }
        if self.min_bedrooms.is_some_and(|min| p.bedrooms < min) {
            return false;
        }
        if self.min_bathrooms.is_some_and(|min| p.bathrooms < min) {
            return false;
        }
        if self.status.is_some_and(|s| p.status != s) {
            return false;
        }
        if self.favorite.is_some_and(|f| p.favorite != f) {
            return false;
        }
        if self.property_type.is_some_and(|t| p.property_type != t) {
            return false;
        }
        if let Some(subtype) = self.property_subtype {
            if p.property_subtype != Some(subtype) {
                return false;
            }
        }
        true
    }
}

pub fn apply_filters(properties: &[Property], filters: &PropertyFilters) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| filters.matches(p))
        .cloned()
        .collect()
}

fn matches_term(p: &Property, needle: &str) -> bool {
    [&p.title, &p.description, &p.address, &p.city, &p.notes]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

pub fn search<'a>(properties: &'a [Property], term: &str) -> Vec<&'a Property> {
    let needle = term.trim().to_lowercase();
    properties
        .iter()
        .filter(|p| needle.is_empty() || matches_term(p, &needle))
        .collect()
}

/// Lowest and highest price among the listings, if any.
pub fn price_bounds(properties: &[Property]) -> Option<(f64, f64)> {
    properties.iter().map(|p| p.price).fold(None, |acc, price| {
        Some(match acc {
            None => (price, price),
            Some((lo, hi)) => (lo.min(price), hi.max(price)),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::sample;

    fn ids(list: &[Property]) -> Vec<&str> {
        list.iter().map(|p| p.id.as_str()).collect()
    }

    fn listings() -> Vec<Property> {
        let mut a = sample("a", 1000.0, 1);
        a.status = Status::Viewed;
        let mut b = sample("b", 2000.0, 2);
        b.favorite = true;
        b.bathrooms = 1.5;
        b.property_subtype = Some(PropertySubtype::Condo);
        let mut c = sample("c", 3000.0, 0);
        c.property_type = PropertyType::Buy;
        c.property_subtype = Some(PropertySubtype::House);
        let mut d = sample("d", 1500.0, 3);
        d.favorite = true;
        vec![a, b, c, d]
    }

    #[test]
    fn default_filters_return_everything_in_order() {
        let list = listings();
        assert_eq!(apply_filters(&list, &PropertyFilters::default()), list);
    }

    #[test]
    fn empty_list_yields_empty() {
        let filters = PropertyFilters::new().with_min_bedrooms(1);
        assert!(apply_filters(&[], &filters).is_empty());
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let list = listings();
        let filters = PropertyFilters::new().with_price_range(Some(1500.0), Some(2000.0));
        assert_eq!(ids(&apply_filters(&list, &filters)), vec!["b", "d"]);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let list = listings();
        let filters = PropertyFilters::new().with_price_range(Some(3000.0), Some(1000.0));
        assert!(apply_filters(&list, &filters).is_empty());
    }

    #[test]
    fn constraints_are_anded() {
        let list = listings();
        let filters = PropertyFilters::new()
            .with_favorite(true)
            .with_min_bedrooms(3);
        assert_eq!(ids(&apply_filters(&list, &filters)), vec!["d"]);
    }

    #[test]
    fn studio_passes_zero_bedroom_minimum() {
        let list = listings();
        let filters = PropertyFilters::new().with_min_bedrooms(0);
        assert_eq!(apply_filters(&list, &filters).len(), 4);
    }

    #[test]
    fn bathrooms_minimum_uses_half_steps() {
        let list = listings();
        let filters = PropertyFilters::new().with_min_bathrooms(1.5);
        assert_eq!(ids(&apply_filters(&list, &filters)), vec!["b"]);
    }

    #[test]
    fn missing_subtype_never_matches_required_subtype() {
        let list = listings();
        let filters = PropertyFilters::new().with_property_subtype(PropertySubtype::Condo);
        assert_eq!(ids(&apply_filters(&list, &filters)), vec!["b"]);
    }

    #[test]
    fn equality_constraints() {
        let list = listings();
        let buy = PropertyFilters::new().with_property_type(PropertyType::Buy);
        assert_eq!(ids(&apply_filters(&list, &buy)), vec!["c"]);

        let viewed = PropertyFilters::new().with_status(Status::Viewed);
        assert_eq!(ids(&apply_filters(&list, &viewed)), vec!["a"]);

        let not_fav = PropertyFilters::new().with_favorite(false);
        assert_eq!(ids(&apply_filters(&list, &not_fav)), vec!["a", "c"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let list = listings();
        let filters = PropertyFilters::new().with_price_range(Some(1200.0), None);
        let once = apply_filters(&list, &filters);
        assert_eq!(apply_filters(&once, &filters), once);
    }

    #[test]
    fn merge_keeps_untouched_constraints() {
        let mut filters = PropertyFilters::new().with_property_type(PropertyType::Rent);
        filters.merge(&PropertyFilters::new().with_min_bedrooms(2));
        assert_eq!(filters.property_type, Some(PropertyType::Rent));
        assert_eq!(filters.min_bedrooms, Some(2));

        filters.merge(&PropertyFilters::new().with_property_type(PropertyType::Buy));
        assert_eq!(filters.property_type, Some(PropertyType::Buy));
        assert_eq!(filters.min_bedrooms, Some(2));
    }

    #[test]
    fn clear_unsets_one_constraint() {
        let mut filters = PropertyFilters::new()
            .with_favorite(true)
            .with_status(Status::Applied);
        filters.clear(FilterKey::Favorite);
        assert_eq!(filters.favorite, None);
        assert_eq!(filters.status, Some(Status::Applied));
        assert!(filters.is_active());
        filters.clear(FilterKey::Status);
        assert!(!filters.is_active());
    }

    #[test]
    fn search_is_case_insensitive_across_text_fields() {
        let mut list = listings();
        list[1].notes = "Close to CAMPUS".into();
        list[2].address = "456 Oak Avenue".into();

        let hits: Vec<_> = search(&list, "campus").iter().map(|p| p.id.clone()).collect();
        assert_eq!(hits, vec!["b"]);

        let hits: Vec<_> = search(&list, "oak ave").iter().map(|p| p.id.clone()).collect();
        assert_eq!(hits, vec!["c"]);
    }

    #[test]
    fn blank_search_returns_everything() {
        let list = listings();
        assert_eq!(search(&list, "   ").len(), list.len());
    }

    #[test]
    fn price_bounds_span_the_list() {
        assert_eq!(price_bounds(&listings()), Some((1000.0, 3000.0)));
        assert_eq!(price_bounds(&[]), None);
    }
}
