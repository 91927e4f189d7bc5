//! Great-circle distance over a spherical Earth.
//!
//! Precision targets comparison and display (roughly 10m), not geodesy.

use serde::Serialize;

use crate::error::ValidationError;

/// Mean Earth radius used by every distance computation in the directory.
///
/// The Postgres store passes this same constant into its SQL so both
/// stores agree on what "within radius" means.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius applied when a proximity search does not name one.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 5.0;

/// Largest radius a proximity search may ask for.
pub const MAX_SEARCH_RADIUS_KM: f64 = 100.0;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Latitude must lie in [-90, 90] and longitude in [-180, 180].
    /// NaN and infinities are rejected.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        check_range("latitude", latitude, -90.0, 90.0)?;
        check_range("longitude", longitude, -180.0, 180.0)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build from values already validated when they were first stored.
    pub(crate) fn from_stored(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A validated, strictly positive search radius in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SearchRadius(f64);

impl SearchRadius {
    pub fn new(km: f64) -> Result<Self, ValidationError> {
        if !km.is_finite() || km <= 0.0 || km > MAX_SEARCH_RADIUS_KM {
            return Err(ValidationError::out_of_range(
                "radius_km",
                km,
                "a positive value",
                MAX_SEARCH_RADIUS_KM,
            ));
        }
        Ok(Self(km))
    }

    pub fn km(&self) -> f64 {
        self.0
    }

    /// Inclusive boundary: a vendor exactly `km` away is inside.
    pub fn contains(&self, distance_km: f64) -> bool {
        distance_km <= self.0
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self(DEFAULT_SEARCH_RADIUS_KM)
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < min || value > max {
        return Err(ValidationError::out_of_range(field, value, min, max));
    }
    Ok(())
}

/// Haversine distance between two points, in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coords(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).expect("test coordinates are in range")
    }

    #[test]
    fn test_coordinates_reject_out_of_range() {
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(-90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, 180.5).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_coordinates_accept_extremes() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_latitude_error_names_field() {
        match Coordinates::new(123.0, 0.0) {
            Err(err) => assert_eq!(err.field(), "latitude"),
            Ok(_) => panic!("latitude 123 must be rejected"),
        }
    }

    #[test]
    fn test_known_distance_accra_to_kumasi() {
        // Accra Central to Kumasi Kejetia, roughly 200 km apart.
        let accra = coords(5.6037, -0.1870);
        let kumasi = coords(6.6885, -1.6244);
        let d = haversine_km(accra, kumasi);
        assert!((195.0..205.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_km(coords(0.0, 0.0), coords(1.0, 0.0));
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn test_antipodal_points_do_not_nan() {
        let d = haversine_km(coords(0.0, 0.0), coords(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_search_radius_bounds() {
        assert!(SearchRadius::new(0.0).is_err());
        assert!(SearchRadius::new(-1.0).is_err());
        assert!(SearchRadius::new(f64::NAN).is_err());
        assert!(SearchRadius::new(MAX_SEARCH_RADIUS_KM + 0.1).is_err());
        assert!(SearchRadius::new(MAX_SEARCH_RADIUS_KM).is_ok());
        assert_eq!(SearchRadius::default().km(), DEFAULT_SEARCH_RADIUS_KM);
    }

    #[test]
    fn test_search_radius_is_inclusive() -> Result<(), ValidationError> {
        let radius = SearchRadius::new(1.0)?;
        assert!(radius.contains(1.0));
        assert!(!radius.contains(1.000_001));
        Ok(())
    }

    fn arb_coordinates() -> impl Strategy<Value = Coordinates> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinates::from_stored(lat, lng))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_distance_is_symmetric(a in arb_coordinates(), b in arb_coordinates()) {
            let ab = haversine_km(a, b);
            let ba = haversine_km(b, a);
            prop_assert!((ab - ba).abs() < 1e-9, "{} vs {}", ab, ba);
        }

        #[test]
        fn prop_distance_to_self_is_zero(a in arb_coordinates()) {
            prop_assert_eq!(haversine_km(a, a), 0.0);
        }

        #[test]
        fn prop_distance_is_bounded_by_half_circumference(a in arb_coordinates(), b in arb_coordinates()) {
            let d = haversine_km(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= EARTH_RADIUS_KM * std::f64::consts::PI + 1e-6);
        }
    }
}
