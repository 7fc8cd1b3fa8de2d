//! # Domain Model: Listings
//!
//! This module defines the core data structures for propz: [`Property`] (one tracked
//! listing), the payloads used to create and edit it ([`PropertyInput`],
//! [`PropertyPatch`]) and the closed enumerations a listing is classified by.
//!
//! ## Field Conventions
//!
//! - **Counts** (`bedrooms`, `square_feet`) are unsigned; `bedrooms == 0` is a studio.
//! - **Amounts** (`price`, `bathrooms`) are `f64`. Bathrooms come in 0.5 steps.
//! - **Geo**: `latitude == 0.0 && longitude == 0.0` means "not placed on the map".
//! - **Links**: `image_url` / `listing_url` are empty strings when absent.
//! - **Lists**: amenities, positive and negative features keep insertion order and
//!   allow duplicates; the order is what the user sees.
//!
//! ## Identity and Lifecycle
//!
//! `id` and `date_added` are assigned by the remote table when a listing is inserted.
//! Neither appears in [`PropertyInput`] or [`PropertyPatch`], so no edit path can
//! reassign them.
//!
//! ## Serialization
//!
//! The in-memory shape serializes with camelCase names (`zipCode`, `squareFeet`, ...).
//! The remote table uses a different naming scheme; see [`crate::mapping`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PropzError, Result};

/// Where the user is in the process for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Interested,
    Viewed,
    Applied,
    Rejected,
    Accepted,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Interested,
        Status::Viewed,
        Status::Applied,
        Status::Rejected,
        Status::Accepted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Interested => "interested",
            Status::Viewed => "viewed",
            Status::Applied => "applied",
            Status::Rejected => "rejected",
            Status::Accepted => "accepted",
        }
    }
}

/// Whether a listing is for rent or for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    Rent,
    Buy,
}

impl PropertyType {
    pub const ALL: [PropertyType; 2] = [PropertyType::Rent, PropertyType::Buy];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Rent => "rent",
            PropertyType::Buy => "buy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertySubtype {
    Apartment,
    House,
    Sharehouse,
    Condo,
    Townhouse,
}

impl PropertySubtype {
    pub const ALL: [PropertySubtype; 5] = [
        PropertySubtype::Apartment,
        PropertySubtype::House,
        PropertySubtype::Sharehouse,
        PropertySubtype::Condo,
        PropertySubtype::Townhouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertySubtype::Apartment => "apartment",
            PropertySubtype::House => "house",
            PropertySubtype::Sharehouse => "sharehouse",
            PropertySubtype::Condo => "condo",
            PropertySubtype::Townhouse => "townhouse",
        }
    }
}

macro_rules! impl_enum_text {
    ($ty:ty, $what:literal, $all:expr) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PropzError;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim().to_ascii_lowercase();
                $all.into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| PropzError::Decode(format!("unknown {}: {}", $what, s)))
            }
        }
    };
}

impl_enum_text!(Status, "status", Status::ALL);
impl_enum_text!(PropertyType, "property type", PropertyType::ALL);
impl_enum_text!(PropertySubtype, "property subtype", PropertySubtype::ALL);

/// One tracked listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: f64,
    #[serde(default)]
    pub square_feet: u32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub listing_url: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_subtype: Option<PropertySubtype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub positive_features: Vec<String>,
    #[serde(default)]
    pub negative_features: Vec<String>,
}

impl Property {
    /// Build the stored record for an input, once the table has assigned identity.
    pub fn from_input(id: impl Into<String>, date_added: DateTime<Utc>, input: PropertyInput) -> Self {
        Self {
            id: id.into(),
            title: input.title,
            description: input.description,
            address: input.address,
            city: input.city,
            state: input.state,
            zip_code: input.zip_code,
            price: input.price,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            square_feet: input.square_feet,
            image_url: input.image_url,
            listing_url: input.listing_url,
            latitude: input.latitude,
            longitude: input.longitude,
            date_added,
            notes: input.notes,
            favorite: input.favorite,
            status: input.status,
            property_type: input.property_type,
            property_subtype: input.property_subtype,
            contact_name: input.contact_name,
            contact_phone: input.contact_phone,
            contact_email: input.contact_email,
            amenities: input.amenities,
            positive_features: input.positive_features,
            negative_features: input.negative_features,
        }
    }

    /// Whether the listing has coordinates.
    pub fn is_placed(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }

    /// Single line address as shown on cards: "street, city, state zip".
    pub fn full_address(&self) -> String {
        let tail = [self.state.as_str(), self.zip_code.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        [self.address.as_str(), self.city.as_str(), tail.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Everything needed to create a listing. Identity and timestamp are assigned
/// by the table, so they are not part of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: f64,
    #[serde(default)]
    pub square_feet: u32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub listing_url: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_subtype: Option<PropertySubtype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub positive_features: Vec<String>,
    #[serde(default)]
    pub negative_features: Vec<String>,
}

impl PropertyInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Form-level checks. The store never calls this; UIs do before `add`.
    pub fn validate(&self) -> Result<()> {
        check_title(&self.title)?;
        check_amount("price", self.price)?;
        check_bathrooms(self.bathrooms)
    }
}

fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(PropzError::Api("Title is required".to_string()));
    }
    Ok(())
}

fn check_amount(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PropzError::Api(format!(
            "{} must be a non-negative number",
            name
        )));
    }
    Ok(())
}

fn check_bathrooms(value: f64) -> Result<()> {
    check_amount("bathrooms", value)?;
    if (value * 2.0).fract() != 0.0 {
        return Err(PropzError::Api(
            "bathrooms must be a multiple of 0.5".to_string(),
        ));
    }
    Ok(())
}

/// Partial edit of a listing. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_feet: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_subtype: Option<PropertySubtype>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positive_features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_features: Option<Vec<String>>,
}

macro_rules! merge_fields {
    ($patch:expr, $target:expr, [$($field:ident),+ $(,)?]) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )+
    };
}

impl PropertyPatch {
    pub fn favorite(value: bool) -> Self {
        Self {
            favorite: Some(value),
            ..Default::default()
        }
    }

    pub fn status(value: Status) -> Self {
        Self {
            status: Some(value),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The same checks as [`PropertyInput::validate`], on the fields that are set.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(price) = self.price {
            check_amount("price", price)?;
        }
        if let Some(bathrooms) = self.bathrooms {
            check_bathrooms(bathrooms)?;
        }
        Ok(())
    }

    /// Shallow merge into a record: every set field overwrites, the rest stay.
    pub fn apply_to(&self, property: &mut Property) {
        merge_fields!(
            self,
            property,
            [
                title,
                description,
                address,
                city,
                state,
                zip_code,
                price,
                bedrooms,
                bathrooms,
                square_feet,
                image_url,
                listing_url,
                latitude,
                longitude,
                notes,
                favorite,
                status,
                property_type,
                amenities,
                positive_features,
                negative_features,
            ]
        );
        if let Some(subtype) = self.property_subtype {
            property.property_subtype = Some(subtype);
        }
        if let Some(name) = &self.contact_name {
            property.contact_name = Some(name.clone());
        }
        if let Some(phone) = &self.contact_phone {
            property.contact_phone = Some(phone.clone());
        }
        if let Some(email) = &self.contact_email {
            property.contact_email = Some(email.clone());
        }
    }
}
