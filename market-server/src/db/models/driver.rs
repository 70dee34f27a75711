//! Driver profile model

use super::serde_helpers::{option_record_id, record_id};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// GeoJSON point, `[longitude, latitude]`
///
/// SurrealDB stores this shape as a native geometry value, which keeps
/// proximity queries possible later without a migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub license_number: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vehicle_details: Option<String>,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current_location: Option<GeoPoint>,
    /// Owning user account
    #[serde(with = "record_id")]
    pub user: RecordId,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverCreate {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub license_number: String,
    #[serde(default)]
    pub vehicle_details: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverUpdate {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vehicle_details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_serializes_as_geojson() {
        let point = GeoPoint::new(28.0473, -26.2041);
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"][0], 28.0473);
        assert_eq!(json["coordinates"][1], -26.2041);
    }
}
