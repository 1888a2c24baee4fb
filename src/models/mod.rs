//! Wire-contract models for the merged catalog.
//!
//! These structs exist only at the serialization boundary: the engine works
//! over untyped [`serde_json::Value`] trees and its output is decoded into
//! [`Hotel`] just before it reaches the store and the HTTP surface.
//!
//! Fields the engine omitted (null or empty leaves) deserialize to their
//! defaults, so the served JSON always carries the full shape: empty strings,
//! empty arrays, and `null` latitude/longitude.

use serde::{Deserialize, Serialize};

/// One merged hotel record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Hotel {
    pub id: String,
    pub destination_id: i64,
    pub name: String,
    pub location: Location,
    pub description: String,
    pub amenities: Amenities,
    pub images: Images,
    pub booking_conditions: Vec<String>,
}

/// Geographic and postal location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: String,
    pub city: String,
    pub country: String,
}

/// Amenities split into hotel-wide and in-room vocabularies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Amenities {
    pub general: Vec<String>,
    pub room: Vec<String>,
}

/// Image galleries keyed by subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Images {
    pub rooms: Vec<ImageLink>,
    pub site: Vec<ImageLink>,
    pub amenities: Vec<ImageLink>,
}

/// A single captioned image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageLink {
    pub link: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_record_fills_defaults() {
        // The engine omits empty leaves; decoding restores the full shape.
        let value = json!({
            "id": "iJhz",
            "destination_id": 5432,
            "name": "Beach Villas Singapore",
            "location": { "country": "Singapore" }
        });

        let hotel: Hotel = serde_json::from_value(value).unwrap();
        assert_eq!(hotel.id, "iJhz");
        assert_eq!(hotel.location.country, "Singapore");
        assert_eq!(hotel.location.lat, None);
        assert!(hotel.description.is_empty());
        assert!(hotel.amenities.general.is_empty());
        assert!(hotel.images.rooms.is_empty());
    }

    #[test]
    fn test_full_shape_on_the_wire() {
        let serialized = serde_json::to_value(Hotel::default()).unwrap();
        assert_eq!(serialized["location"]["lat"], serde_json::Value::Null);
        assert_eq!(serialized["amenities"]["general"], json!([]));
        assert_eq!(serialized["images"]["site"], json!([]));
        assert_eq!(serialized["booking_conditions"], json!([]));
    }
}
