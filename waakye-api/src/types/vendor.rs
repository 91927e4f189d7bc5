//! Vendor request and query types.

use serde::{Deserialize, Serialize};
use waakye_core::{
    Coordinates, NewLocation, NewVendor, PageRequest, SearchRadius, ValidationError,
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};

use crate::validation::{ParseParam, RequireField};

/// Location part of a create-vendor request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LocationRequest {
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub landmark: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Request to register a vendor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateVendorRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub operating_hours: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub phone_number: String,
    pub location: Option<LocationRequest>,
}

impl CreateVendorRequest {
    /// Validate and convert into a storable vendor.
    pub fn into_new_vendor(self) -> Result<NewVendor, ValidationError> {
        let location = self.location.require("location")?;
        let coordinates = Coordinates::new(
            location.latitude.require("location.latitude")?,
            location.longitude.require("location.longitude")?,
        )?;

        let vendor = NewVendor {
            name: self.name.trim().to_string(),
            description: self.description,
            operating_hours: self.operating_hours,
            image_url: self.image_url,
            phone_number: self.phone_number,
            location: NewLocation {
                street_address: location.street_address.trim().to_string(),
                city: location.city.trim().to_string(),
                region: location.region.trim().to_string(),
                landmark: location.landmark,
                coordinates,
            },
        };
        vendor.validate()?;
        Ok(vendor)
    }
}

/// `?page=&page_size=` for listing endpoints. Kept as text so malformed
/// values produce a field-level error instead of a generic rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct PaginationQuery {
    /// Page number, starting at 1 (default 1)
    #[cfg_attr(feature = "openapi", param(value_type = Option<i64>))]
    pub page: Option<String>,
    /// Items per page (default 10)
    #[cfg_attr(feature = "openapi", param(value_type = Option<i64>))]
    pub page_size: Option<String>,
}

impl PaginationQuery {
    pub fn to_page_request(&self) -> Result<PageRequest, ValidationError> {
        let page = self
            .page
            .parse_i64_param("page")?
            .unwrap_or(i64::from(DEFAULT_PAGE));
        let page_size = self
            .page_size
            .parse_i64_param("page_size")?
            .unwrap_or(i64::from(DEFAULT_PAGE_SIZE));
        PageRequest::new(page, page_size)
    }
}

/// `?lat=&lng=&radius_km=` for proximity search.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct NearbyQuery {
    /// Latitude of the search centre
    #[cfg_attr(feature = "openapi", param(value_type = f64))]
    pub lat: Option<String>,
    /// Longitude of the search centre
    #[cfg_attr(feature = "openapi", param(value_type = f64))]
    pub lng: Option<String>,
    /// Search radius in kilometres, (0, 100] (default 5)
    #[cfg_attr(feature = "openapi", param(value_type = Option<f64>))]
    pub radius_km: Option<String>,
}

impl NearbyQuery {
    pub fn to_search(&self) -> Result<(Coordinates, SearchRadius), ValidationError> {
        let lat = self.lat.parse_f64_param("lat")?.require("lat")?;
        let lng = self.lng.parse_f64_param("lng")?.require("lng")?;
        let center = Coordinates::new(lat, lng)?;
        let radius = match self.radius_km.parse_f64_param("radius_km")? {
            Some(km) => SearchRadius::new(km)?,
            None => SearchRadius::default(),
        };
        Ok((center, radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateVendorRequest {
        CreateVendorRequest {
            name: " Auntie Muni ".to_string(),
            description: "Waakye and shito".to_string(),
            operating_hours: "06:00-11:00".to_string(),
            image_url: String::new(),
            phone_number: "+233201234567".to_string(),
            location: Some(LocationRequest {
                street_address: "Ring Road".to_string(),
                city: "Accra".to_string(),
                region: "Greater Accra".to_string(),
                landmark: "Circle".to_string(),
                latitude: Some(5.6037),
                longitude: Some(-0.1870),
            }),
        }
    }

    #[test]
    fn test_valid_request_converts() -> Result<(), ValidationError> {
        let vendor = request().into_new_vendor()?;
        assert_eq!(vendor.name, "Auntie Muni");
        assert_eq!(vendor.location.coordinates.latitude(), 5.6037);
        Ok(())
    }

    #[test]
    fn test_missing_location_is_rejected() {
        let req = CreateVendorRequest {
            location: None,
            ..request()
        };
        assert!(matches!(
            req.into_new_vendor(),
            Err(ValidationError::RequiredFieldMissing { field }) if field == "location"
        ));
    }

    #[test]
    fn test_out_of_range_latitude_is_rejected() {
        let mut req = request();
        if let Some(loc) = req.location.as_mut() {
            loc.latitude = Some(91.0);
        }
        match req.into_new_vendor() {
            Err(err) => assert_eq!(err.field(), "latitude"),
            Ok(_) => panic!("latitude 91 must be rejected"),
        }
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let req = CreateVendorRequest {
            name: "   ".to_string(),
            ..request()
        };
        match req.into_new_vendor() {
            Err(err) => assert_eq!(err.field(), "name"),
            Ok(_) => panic!("blank name must be rejected"),
        }
    }

    #[test]
    fn test_pagination_defaults() -> Result<(), ValidationError> {
        let page = PaginationQuery::default().to_page_request()?;
        assert_eq!((page.page(), page.page_size()), (1, 10));
        Ok(())
    }

    #[test]
    fn test_pagination_rejects_zero_page() {
        let query = PaginationQuery {
            page: Some("0".to_string()),
            page_size: None,
        };
        assert!(query.to_page_request().is_err());
    }

    #[test]
    fn test_nearby_default_radius() -> Result<(), ValidationError> {
        let query = NearbyQuery {
            lat: Some("5.6037".to_string()),
            lng: Some("-0.1870".to_string()),
            radius_km: None,
        };
        let (_, radius) = query.to_search()?;
        assert_eq!(radius.km(), 5.0);
        Ok(())
    }

    #[test]
    fn test_nearby_requires_lat() {
        let query = NearbyQuery {
            lat: None,
            lng: Some("-0.1870".to_string()),
            radius_km: None,
        };
        match query.to_search() {
            Err(err) => assert_eq!(err.field(), "lat"),
            Ok(_) => panic!("missing lat must be rejected"),
        }
    }
}
