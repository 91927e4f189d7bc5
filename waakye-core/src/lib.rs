//! Waakye Core - Entity Types
//!
//! Data structures, validated value types and the distance calculator shared
//! by every other crate in the workspace. No I/O lives here.

pub mod entities;
pub mod error;
pub mod geo;
pub mod identity;
pub mod pagination;
pub mod rating;

pub use entities::{EntityType, Location, NewLocation, NewVendor, Vendor};
pub use error::{StorageError, ValidationError, WaakyeError, WaakyeResult};
pub use geo::{
    haversine_km, Coordinates, SearchRadius, DEFAULT_SEARCH_RADIUS_KM, EARTH_RADIUS_KM,
    MAX_SEARCH_RADIUS_KM,
};
pub use identity::{EntityIdType, LocationId, RatingId, Timestamp, VendorId};
pub use pagination::{total_pages, Page, PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use rating::{
    NewRating, Rating, RatingAggregate, RatingComment, RatingScores, Score, VendorRatings,
};
