//! Vendor and location entities.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geo::Coordinates;
use crate::identity::{LocationId, Timestamp, VendorId};
use crate::rating::{Rating, RatingAggregate};

/// Entity type discriminator used in errors and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Vendor,
    Location,
    Rating,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Vendor => "vendor",
            EntityType::Location => "location",
            EntityType::Rating => "rating",
        }
    }
}

/// Physical address of a vendor. Owned by exactly one vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Location {
    pub id: LocationId,
    pub street_address: String,
    pub city: String,
    pub region: String,
    pub landmark: String,
    pub latitude: f64,
    pub longitude: f64,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: Timestamp,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::from_stored(self.latitude, self.longitude)
    }
}

/// A food vendor as returned by the directory.
///
/// `rating_summary` is always computed live. `distance_km` is only set by
/// proximity search and `ratings` only by a single-vendor fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub description: String,
    pub operating_hours: String,
    pub image_url: String,
    pub phone_number: String,
    pub is_verified: bool,
    pub location: Location,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub updated_at: Timestamp,
    pub rating_summary: RatingAggregate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Vec<Rating>>,
}

/// Location fields supplied when registering a vendor.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub street_address: String,
    pub city: String,
    pub region: String,
    pub landmark: String,
    pub coordinates: Coordinates,
}

/// Vendor fields supplied when registering a vendor.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVendor {
    pub name: String,
    pub description: String,
    pub operating_hours: String,
    pub image_url: String,
    pub phone_number: String,
    pub location: NewLocation,
}

impl NewVendor {
    /// Name and the address parts a customer needs to find the stall are
    /// mandatory. Coordinates were range-checked when `Coordinates` was built.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("location.street_address", &self.location.street_address)?;
        require("location.city", &self.location.city)?;
        require("location.region", &self.location.region)?;
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::EntityIdType;
    use chrono::Utc;

    fn new_vendor() -> NewVendor {
        NewVendor {
            name: "Auntie Muni Waakye".to_string(),
            description: "Waakye with shito and wele".to_string(),
            operating_hours: "06:00-11:00".to_string(),
            image_url: "https://img.example/muni.jpg".to_string(),
            phone_number: "+233201234567".to_string(),
            location: NewLocation {
                street_address: "Ring Road Central".to_string(),
                city: "Accra".to_string(),
                region: "Greater Accra".to_string(),
                landmark: "Opposite Kwame Nkrumah Circle".to_string(),
                coordinates: Coordinates::new(5.6037, -0.1870).expect("valid coordinates"),
            },
        }
    }

    #[test]
    fn test_valid_new_vendor_passes() {
        assert!(new_vendor().validate().is_ok());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut vendor = new_vendor();
        vendor.name = "   ".to_string();
        assert_eq!(
            vendor.validate(),
            Err(ValidationError::RequiredFieldMissing {
                field: "name".to_string()
            })
        );
    }

    #[test]
    fn test_blank_city_is_rejected() {
        let mut vendor = new_vendor();
        vendor.location.city.clear();
        match vendor.validate() {
            Err(err) => assert_eq!(err.field(), "location.city"),
            Ok(()) => panic!("blank city must be rejected"),
        }
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let mut vendor = new_vendor();
        vendor.description.clear();
        vendor.image_url.clear();
        vendor.location.landmark.clear();
        assert!(vendor.validate().is_ok());
    }

    #[test]
    fn test_vendor_omits_absent_derived_fields() -> Result<(), serde_json::Error> {
        let now = Utc::now();
        let vendor = Vendor {
            id: VendorId::now_v7(),
            name: "Kofi's".to_string(),
            description: String::new(),
            operating_hours: String::new(),
            image_url: String::new(),
            phone_number: String::new(),
            is_verified: false,
            location: Location {
                id: LocationId::now_v7(),
                street_address: "1 Oxford St".to_string(),
                city: "Accra".to_string(),
                region: "Greater Accra".to_string(),
                landmark: String::new(),
                latitude: 5.55,
                longitude: -0.18,
                created_at: now,
            },
            created_at: now,
            updated_at: now,
            rating_summary: RatingAggregate::empty(),
            distance_km: None,
            ratings: None,
        };
        let json = serde_json::to_value(&vendor)?;
        assert!(json.get("distance_km").is_none());
        assert!(json.get("ratings").is_none());
        assert_eq!(json["rating_summary"]["total_ratings"], 0);

        let back: Vendor = serde_json::from_value(json)?;
        assert_eq!(back, vendor);
        Ok(())
    }
}
