//! Waakye Test Utilities
//!
//! Shared test infrastructure for the waakye workspace:
//! - Proptest generators for the core value types
//! - Fixtures for the Accra scenarios the router tests replay
//! - Assertions for directory-specific invariants

// Re-export stores so tests only need this crate for wiring
pub use waakye_storage::{
    CacheBackend, CacheConfig, InMemoryStore, MemoryCacheBackend, RatingStore, VendorCache,
    VendorStore,
};

// Re-export core types for convenience
pub use waakye_core::{
    haversine_km, Coordinates, EntityIdType, EntityType, NewLocation, NewRating, NewVendor,
    PageRequest, Rating, RatingAggregate, RatingScores, SearchRadius, StorageError, Timestamp,
    ValidationError, Vendor, VendorId, VendorRatings, WaakyeError, WaakyeResult,
};

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating directory value types.

    use super::*;
    use proptest::prelude::*;

    /// Generate a random UUID.
    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    pub fn arb_vendor_id() -> impl Strategy<Value = VendorId> {
        arb_uuid().prop_map(VendorId::new)
    }

    /// Timestamps between 2020 and 2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1_577_836_800i64..1_893_456_000i64)
            .prop_map(|secs| Utc.timestamp_opt(secs, 0).single().unwrap_or_else(Utc::now))
    }

    /// Any valid coordinate pair on the globe.
    pub fn arb_coordinates() -> impl Strategy<Value = Coordinates> {
        (-90.0f64..=90.0, -180.0f64..=180.0)
            .prop_filter_map("coordinates in range", |(lat, lng)| {
                Coordinates::new(lat, lng).ok()
            })
    }

    /// Coordinates within roughly 20 km of central Accra.
    pub fn arb_accra_coordinates() -> impl Strategy<Value = Coordinates> {
        (5.45f64..5.75, -0.35f64..-0.05).prop_filter_map("coordinates in range", |(lat, lng)| {
            Coordinates::new(lat, lng).ok()
        })
    }

    /// A single valid sub-score.
    pub fn arb_score_value() -> impl Strategy<Value = i64> {
        1i64..=5
    }

    /// A value no sub-score accepts.
    pub fn arb_invalid_score_value() -> impl Strategy<Value = i64> {
        prop_oneof![i64::MIN..1i64, 6i64..i64::MAX]
    }

    pub fn arb_rating_scores() -> impl Strategy<Value = RatingScores> {
        (
            arb_score_value(),
            arb_score_value(),
            arb_score_value(),
            arb_score_value(),
        )
            .prop_filter_map("scores in range", |(h, v, t, s)| {
                RatingScores::new(h, v, t, s).ok()
            })
    }

    pub fn arb_new_rating() -> impl Strategy<Value = NewRating> {
        (
            arb_rating_scores(),
            proptest::option::of("[a-zA-Z ]{0,40}"),
        )
            .prop_map(|(scores, comment)| NewRating::new(scores, comment))
    }

    /// A registrable vendor somewhere in Accra.
    pub fn arb_new_vendor() -> impl Strategy<Value = NewVendor> {
        (
            "[A-Z][a-z]{2,12}( [A-Z][a-z]{2,10})? Waakye",
            "[A-Z][a-z]{3,12} (Road|Street|Avenue)",
            arb_accra_coordinates(),
        )
            .prop_map(|(name, street, coordinates)| NewVendor {
                name,
                description: String::new(),
                operating_hours: "06:00-11:00".to_string(),
                image_url: String::new(),
                phone_number: String::new(),
                location: NewLocation {
                    street_address: street,
                    city: "Accra".to_string(),
                    region: "Greater Accra".to_string(),
                    landmark: String::new(),
                    coordinates,
                },
            })
    }

    /// Page and page size as a client might send them, valid or not.
    pub fn arb_page_params() -> impl Strategy<Value = (i64, i64)> {
        (-5i64..50, -5i64..150)
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for the common directory scenarios.

    use super::*;

    /// Central Accra, where the reference vendor sits.
    pub const ACCRA: (f64, f64) = (5.6037, -0.1870);

    /// Kumasi, about 200 km from Accra.
    pub const KUMASI: (f64, f64) = (6.6885, -1.6244);

    /// The first rating of the Accra scenario.
    pub const FIRST_RATING: [i64; 4] = [4, 5, 3, 4];

    /// The second rating of the Accra scenario.
    pub const SECOND_RATING: [i64; 4] = [2, 3, 4, 5];

    pub fn coordinates(latlng: (f64, f64)) -> Coordinates {
        Coordinates::new(latlng.0, latlng.1).expect("fixture coordinates are in range")
    }

    /// A vendor named `name` at `latlng` with every required field set.
    pub fn vendor_at(name: &str, latlng: (f64, f64)) -> NewVendor {
        NewVendor {
            name: name.to_string(),
            description: "Waakye with shito, wele and talia".to_string(),
            operating_hours: "06:00-11:00".to_string(),
            image_url: "https://img.example/waakye.jpg".to_string(),
            phone_number: "+233201234567".to_string(),
            location: NewLocation {
                street_address: "Ring Road Central".to_string(),
                city: "Accra".to_string(),
                region: "Greater Accra".to_string(),
                landmark: "Opposite the filling station".to_string(),
                coordinates: coordinates(latlng),
            },
        }
    }

    pub fn accra_vendor() -> NewVendor {
        vendor_at("Auntie Muni Waakye", ACCRA)
    }

    pub fn kumasi_vendor() -> NewVendor {
        let mut vendor = vendor_at("Adum Waakye Joint", KUMASI);
        vendor.location.street_address = "Prempeh II Street".to_string();
        vendor.location.city = "Kumasi".to_string();
        vendor.location.region = "Ashanti".to_string();
        vendor
    }

    pub fn scores(values: [i64; 4]) -> RatingScores {
        RatingScores::new(values[0], values[1], values[2], values[3])
            .expect("fixture scores are in range")
    }

    pub fn rating(values: [i64; 4], comment: Option<&str>) -> NewRating {
        NewRating::new(scores(values), comment.map(str::to_string))
    }

    /// JSON body a client would POST to register `vendor`.
    pub fn create_vendor_body(vendor: &NewVendor) -> serde_json::Value {
        serde_json::json!({
            "name": vendor.name,
            "description": vendor.description,
            "operating_hours": vendor.operating_hours,
            "image_url": vendor.image_url,
            "phone_number": vendor.phone_number,
            "location": {
                "street_address": vendor.location.street_address,
                "city": vendor.location.city,
                "region": vendor.location.region,
                "landmark": vendor.location.landmark,
                "latitude": vendor.location.coordinates.latitude(),
                "longitude": vendor.location.coordinates.longitude(),
            }
        })
    }

    /// JSON body a client would POST to rate a vendor.
    pub fn rate_body(values: [i64; 4], comment: Option<&str>) -> serde_json::Value {
        let mut body = serde_json::json!({
            "hygiene_rating": values[0],
            "value_rating": values[1],
            "taste_rating": values[2],
            "service_rating": values[3],
        });
        if let (Some(comment), Some(map)) = (comment, body.as_object_mut()) {
            map.insert("comment".to_string(), comment.into());
        }
        body
    }

    pub fn memory_store() -> Arc<InMemoryStore> {
        Arc::new(InMemoryStore::default())
    }

    /// Read-through cache over a fresh in-process backend.
    pub fn memory_cache() -> VendorCache {
        VendorCache::with_defaults(Arc::new(MemoryCacheBackend::new()))
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion helpers for directory-specific validation.

    use super::*;

    /// Tolerance for comparing averaged scores and distances.
    pub const EPSILON: f64 = 1e-9;

    #[track_caller]
    pub fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    /// Assert that a WaakyeResult is a vendor NotFound error.
    #[track_caller]
    pub fn assert_vendor_not_found<T: std::fmt::Debug>(result: &WaakyeResult<T>) {
        match result {
            Err(WaakyeError::NotFound {
                entity_type: EntityType::Vendor,
                ..
            }) => {}
            other => panic!("Expected vendor NotFound error, got: {:?}", other),
        }
    }

    /// Assert that a WaakyeResult is a validation error on `field`.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &WaakyeResult<T>, field: &str) {
        match result {
            Err(WaakyeError::Validation(e)) => {
                assert_eq!(e.field(), field, "Wrong field in validation error: {}", e)
            }
            other => panic!("Expected Validation error on {}, got: {:?}", field, other),
        }
    }

    /// Assert that a WaakyeResult is a storage error.
    #[track_caller]
    pub fn assert_storage_error<T: std::fmt::Debug>(result: &WaakyeResult<T>) {
        match result {
            Err(WaakyeError::Storage(_)) => {}
            other => panic!("Expected Storage error, got: {:?}", other),
        }
    }

    /// Assert per-dimension averages, in hygiene/value/taste/service order,
    /// plus the overall mean and count.
    #[track_caller]
    pub fn assert_aggregate(
        aggregate: &RatingAggregate,
        averages: [f64; 4],
        overall: f64,
        total: u64,
    ) {
        assert_close(aggregate.hygiene_rating, averages[0]);
        assert_close(aggregate.value_rating, averages[1]);
        assert_close(aggregate.taste_rating, averages[2]);
        assert_close(aggregate.service_rating, averages[3]);
        assert_close(aggregate.overall_rating, overall);
        assert_eq!(aggregate.total_ratings, total, "Wrong rating count");
    }

    /// Assert that a proximity result is sorted nearest first and that every
    /// distance is within `radius_km`.
    #[track_caller]
    pub fn assert_nearest_first(vendors: &[Vendor], radius_km: f64) {
        let distances: Vec<f64> = vendors
            .iter()
            .map(|v| {
                v.distance_km
                    .unwrap_or_else(|| panic!("vendor {} has no distance", v.id))
            })
            .collect();
        for d in &distances {
            assert!(*d <= radius_km, "distance {} exceeds radius {}", d, radius_km);
        }
        assert!(
            distances.windows(2).all(|w| w[0] <= w[1]),
            "not sorted nearest first: {:?}",
            distances
        );
    }

    /// Assert that vendors are ordered newest first.
    #[track_caller]
    pub fn assert_newest_first(vendors: &[Vendor]) {
        assert!(
            vendors.windows(2).all(|w| w[0].created_at >= w[1].created_at),
            "vendors not ordered newest first"
        );
    }

    /// Assert that vendors are ordered by overall rating, best first.
    #[track_caller]
    pub fn assert_best_rated_first(vendors: &[Vendor]) {
        assert!(
            vendors.windows(2).all(|w| {
                w[0].rating_summary.overall_rating >= w[1].rating_summary.overall_rating
            }),
            "vendors not ordered by overall rating"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::assertions::*;
    use super::fixtures::*;
    use super::generators::*;
    use proptest::prelude::*;

    #[test]
    fn test_accra_scenario_aggregate() {
        let first = scores(FIRST_RATING);
        let second = scores(SECOND_RATING);
        let aggregate = super::RatingAggregate::from_scores([first, second].iter());
        assert_aggregate(&aggregate, [3.0, 4.0, 3.5, 4.5], 3.75, 2);
    }

    #[test]
    fn test_kumasi_is_outside_default_radius() {
        let d = super::haversine_km(coordinates(ACCRA), coordinates(KUMASI));
        assert!(d > 150.0 && d < 250.0, "unexpected distance {}", d);
    }

    #[test]
    fn test_rate_body_omits_absent_comment() {
        let body = rate_body(FIRST_RATING, None);
        assert!(body.get("comment").is_none());
        let body = rate_body(FIRST_RATING, Some("Shito was on point"));
        assert_eq!(body["comment"], "Shito was on point");
    }

    proptest! {
        #[test]
        fn prop_generated_vendors_validate(vendor in arb_new_vendor()) {
            prop_assert!(vendor.validate().is_ok());
        }

        #[test]
        fn prop_invalid_scores_rejected(bad in arb_invalid_score_value(), good in arb_score_value()) {
            prop_assert!(super::RatingScores::new(bad, good, good, good).is_err());
        }
    }
}
