//! Async store traits for vendors and ratings.
//!
//! Both the Postgres client in `waakye-api` and [`crate::InMemoryStore`]
//! implement these, so the query orchestrator never knows which one it has.

use ::async_trait::async_trait;
use waakye_core::{
    Coordinates, NewRating, NewVendor, PageRequest, Rating, SearchRadius, Vendor, VendorId,
    VendorRatings, WaakyeResult,
};

/// Whether a single-vendor fetch should attach the full rating history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingHistory {
    Include,
    Omit,
}

/// Durable storage for vendors and their locations.
///
/// Every method is a single attempt. Failures surface as
/// `WaakyeError::Storage` with driver detail kept for logs.
#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Insert a location and the vendor that owns it, all or nothing.
    async fn create_vendor(&self, vendor: &NewVendor) -> WaakyeResult<Vendor>;

    /// Fetch one vendor with its live rating aggregate.
    async fn get_vendor(&self, id: VendorId, history: RatingHistory)
        -> WaakyeResult<Option<Vendor>>;

    /// Newest first. An out-of-range page is empty, not an error.
    async fn list_vendors(&self, page: PageRequest) -> WaakyeResult<Vec<Vendor>>;

    async fn count_vendors(&self) -> WaakyeResult<u64>;

    async fn list_verified_vendors(&self, page: PageRequest) -> WaakyeResult<Vec<Vendor>>;

    async fn count_verified_vendors(&self) -> WaakyeResult<u64>;

    /// Vendors within `radius` of `center` (inclusive), nearest first,
    /// each carrying `distance_km`.
    async fn find_nearby(
        &self,
        center: Coordinates,
        radius: SearchRadius,
    ) -> WaakyeResult<Vec<Vendor>>;

    /// Vendors with at least one rating, best overall first, ties broken
    /// by vendor id ascending.
    async fn top_rated(&self, limit: usize) -> WaakyeResult<Vec<Vendor>>;

    /// Connectivity check used by the readiness endpoint.
    async fn health_check(&self) -> WaakyeResult<()>;
}

/// Durable storage for ratings.
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Insert one rating. Input is already validated and the vendor is
    /// assumed to exist.
    async fn submit_rating(&self, vendor_id: VendorId, rating: &NewRating) -> WaakyeResult<Rating>;

    /// Aggregate plus non-empty comments, newest first. Zeroed when the
    /// vendor has no ratings.
    async fn rating_summary(&self, vendor_id: VendorId) -> WaakyeResult<VendorRatings>;
}
