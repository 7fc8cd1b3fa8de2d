//! # Field Mapping at the Table Boundary
//!
//! The hosted table names columns differently from the in-memory model: compound
//! names are lower-cased and concatenated (`zipCode` → `zipcode`,
//! `positiveFeatures` → `positivefeatures`), and rows carry an owner column
//! (`user_id`) plus an `updated_at` stamp the model never exposes.
//!
//! [`FIELD_MAP`] is the only place that pairing is written down. Every path that
//! crosses the boundary goes through it:
//!
//! | Direction | Function |
//! |-----------|----------|
//! | create | [`input_to_row`] |
//! | update | [`patch_to_row`] |
//! | read   | [`row_to_property`] |
//!
//! ## Reading Rows
//!
//! Absent and `null` columns are dropped before decoding, so the model's serde
//! defaults apply: empty string, zero, `false`, empty list, `rent`, `interested`.
//! Numeric columns that arrive as strings (Postgres `numeric`) are coerced.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{PropzError, Result};
use crate::model::{Property, PropertyInput, PropertyPatch};

/// A row as the table sees it.
pub type Row = Map<String, Value>;

pub const OWNER_COLUMN: &str = "user_id";
pub const UPDATED_AT_COLUMN: &str = "updated_at";
pub const ID_COLUMN: &str = "id";
pub const DATE_ADDED_COLUMN: &str = "dateadded";

/// (model field, table column)
pub const FIELD_MAP: &[(&str, &str)] = &[
    ("id", ID_COLUMN),
    ("title", "title"),
    ("description", "description"),
    ("address", "address"),
    ("city", "city"),
    ("state", "state"),
    ("zipCode", "zipcode"),
    ("price", "price"),
    ("bedrooms", "bedrooms"),
    ("bathrooms", "bathrooms"),
    ("squareFeet", "squarefeet"),
    ("imageUrl", "imageurl"),
    ("listingUrl", "listingurl"),
    ("latitude", "latitude"),
    ("longitude", "longitude"),
    ("dateAdded", DATE_ADDED_COLUMN),
    ("notes", "notes"),
    ("favorite", "favorite"),
    ("status", "status"),
    ("propertyType", "propertytype"),
    ("propertySubtype", "propertysubtype"),
    ("contactName", "contactname"),
    ("contactPhone", "contactphone"),
    ("contactEmail", "contactemail"),
    ("amenities", "amenities"),
    ("positiveFeatures", "positivefeatures"),
    ("negativeFeatures", "negativefeatures"),
];

const NUMERIC_FIELDS: &[&str] = &[
    "price",
    "bedrooms",
    "bathrooms",
    "squareFeet",
    "latitude",
    "longitude",
];

pub fn column_for(field: &str) -> Option<&'static str> {
    FIELD_MAP
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, c)| *c)
}

pub fn field_for(column: &str) -> Option<&'static str> {
    FIELD_MAP
        .iter()
        .find(|(_, c)| *c == column)
        .map(|(f, _)| *f)
}

/// Rename model keys to column keys. Keys outside the map are dropped.
fn model_to_columns(value: Value) -> Result<Row> {
    let Value::Object(fields) = value else {
        return Err(PropzError::Decode("expected an object".to_string()));
    };
    Ok(fields
        .into_iter()
        .filter_map(|(key, v)| column_for(&key).map(|col| (col.to_string(), v)))
        .collect())
}

/// Insert payload: every input field plus the owner column.
pub fn input_to_row(owner: &str, input: &PropertyInput) -> Result<Row> {
    let mut row = model_to_columns(serde_json::to_value(input)?)?;
    row.insert(OWNER_COLUMN.to_string(), Value::String(owner.to_string()));
    Ok(row)
}

/// Update payload: only the set fields, plus `updated_at`.
pub fn patch_to_row(patch: &PropertyPatch, now: DateTime<Utc>) -> Result<Row> {
    let mut row = model_to_columns(serde_json::to_value(patch)?)?;
    row.insert(
        UPDATED_AT_COLUMN.to_string(),
        Value::String(now.to_rfc3339()),
    );
    Ok(row)
}

pub fn row_to_property(row: &Row) -> Result<Property> {
    let mut fields = Map::new();
    for (field, column) in FIELD_MAP {
        let Some(value) = row.get(*column) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let value = if NUMERIC_FIELDS.contains(field) {
            coerce_number(value)
        } else {
            value.clone()
        };
        fields.insert(field.to_string(), value);
    }
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| PropzError::Decode(format!("bad property row: {}", e)))
}

fn coerce_number(value: &Value) -> Value {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(|n| {
                if n.fract() == 0.0 && n >= 0.0 && n <= u32::MAX as f64 {
                    Some(Value::from(n as u64))
                } else {
                    serde_json::Number::from_f64(n).map(Value::Number)
                }
            })
            .unwrap_or(Value::Null),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PropertySubtype, PropertyType, Status};
    use serde_json::json;

    fn full_input() -> PropertyInput {
        PropertyInput {
            title: "Modern Downtown Apartment".into(),
            description: "Views".into(),
            address: "123 Main Street".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            zip_code: "94105".into(),
            price: 2800.0,
            bedrooms: 2,
            bathrooms: 2.5,
            square_feet: 1050,
            image_url: "https://img".into(),
            listing_url: "https://listing".into(),
            latitude: 37.7749,
            longitude: -122.4194,
            notes: "near transit".into(),
            favorite: true,
            status: Status::Viewed,
            property_type: PropertyType::Buy,
            property_subtype: Some(PropertySubtype::Condo),
            contact_name: Some("John Smith".into()),
            contact_phone: Some("415-555-1234".into()),
            contact_email: Some("john@example.com".into()),
            amenities: vec!["Gym".into(), "Gym".into()],
            positive_features: vec!["Light".into()],
            negative_features: vec!["Noise".into()],
        }
    }

    #[test]
    fn every_model_field_has_a_column() {
        let value = serde_json::to_value(full_input()).unwrap();
        for key in value.as_object().unwrap().keys() {
            assert!(column_for(key).is_some(), "unmapped field {}", key);
        }
    }

    #[test]
    fn columns_and_fields_are_one_to_one() {
        for (field, column) in FIELD_MAP {
            assert_eq!(field_for(column), Some(*field));
            assert_eq!(column_for(field), Some(*column));
        }
    }

    #[test]
    fn input_row_uses_concatenated_lowercase_columns() {
        let row = input_to_row("owner-1", &full_input()).unwrap();
        assert_eq!(row["zipcode"], json!("94105"));
        assert_eq!(row["squarefeet"], json!(1050));
        assert_eq!(row["propertytype"], json!("buy"));
        assert_eq!(row["propertysubtype"], json!("condo"));
        assert_eq!(row["positivefeatures"], json!(["Light"]));
        assert_eq!(row[OWNER_COLUMN], json!("owner-1"));
        assert!(!row.contains_key("zipCode"));
        assert!(!row.contains_key(ID_COLUMN));
        assert!(!row.contains_key(DATE_ADDED_COLUMN));
    }

    #[test]
    fn patch_row_only_carries_set_fields() {
        let patch = PropertyPatch {
            square_feet: Some(900),
            contact_email: Some("a@b.c".into()),
            ..Default::default()
        };
        let row = patch_to_row(&patch, Utc::now()).unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row["squarefeet"], json!(900));
        assert_eq!(row["contactemail"], json!("a@b.c"));
        assert!(row.contains_key(UPDATED_AT_COLUMN));
    }

    #[test]
    fn row_reads_back_into_the_model() {
        let mut row = input_to_row("owner-1", &full_input()).unwrap();
        row.insert(ID_COLUMN.into(), json!("p1"));
        row.insert(DATE_ADDED_COLUMN.into(), json!("2023-09-15T08:00:00Z"));

        let property = row_to_property(&row).unwrap();
        assert_eq!(property.id, "p1");
        assert_eq!(property.zip_code, "94105");
        assert_eq!(property.bathrooms, 2.5);
        assert_eq!(property.property_subtype, Some(PropertySubtype::Condo));
        assert_eq!(property.amenities, vec!["Gym", "Gym"]);
        assert_eq!(
            Property::from_input("p1", property.date_added, full_input()),
            property
        );
    }

    #[test]
    fn missing_and_null_columns_take_defaults() {
        let row = json!({
            "id": "p2",
            "title": "Studio",
            "dateadded": "2023-09-10T15:30:00Z",
            "description": null,
            "imageurl": null,
            "favorite": null,
            "amenities": null,
        });
        let property = row_to_property(row.as_object().unwrap()).unwrap();
        assert_eq!(property.description, "");
        assert_eq!(property.image_url, "");
        assert!(!property.favorite);
        assert!(property.amenities.is_empty());
        assert_eq!(property.latitude, 0.0);
        assert_eq!(property.property_type, PropertyType::Rent);
        assert_eq!(property.status, Status::Interested);
        assert_eq!(property.property_subtype, None);
        assert_eq!(property.contact_name, None);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let row = json!({
            "id": "p3",
            "title": "Condo",
            "dateadded": "2023-09-05T12:15:00Z",
            "price": "4500.00",
            "bathrooms": "2.5",
            "bedrooms": 3,
        });
        let property = row_to_property(row.as_object().unwrap()).unwrap();
        assert_eq!(property.price, 4500.0);
        assert_eq!(property.bathrooms, 2.5);
        assert_eq!(property.bedrooms, 3);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let row = json!({
            "id": "p4",
            "title": "X",
            "dateadded": "2023-09-05T12:15:00Z",
            "status": "shortlisted",
        });
        assert!(matches!(
            row_to_property(row.as_object().unwrap()),
            Err(PropzError::Decode(_))
        ));
    }
}
