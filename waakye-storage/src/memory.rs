//! Process-local implementation of the store traits.
//!
//! Used for development (`WAAKYE_STORAGE=memory`) and as the store behind
//! router and orchestrator tests.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ::async_trait::async_trait;
use chrono::Utc;
use tracing::Span;
use waakye_core::{
    haversine_km, Coordinates, EntityIdType, Location, LocationId, NewRating, NewVendor,
    PageRequest, Rating, RatingAggregate, RatingComment, RatingId, SearchRadius, StorageError,
    Vendor, VendorId, VendorRatings, WaakyeResult,
};

use crate::traits::{RatingHistory, RatingStore, VendorStore};

#[derive(Debug, Default)]
struct Tables {
    vendors: HashMap<VendorId, Vendor>,
    ratings: Vec<Rating>,
}

impl Tables {
    fn ratings_for(&self, vendor_id: VendorId) -> impl Iterator<Item = &Rating> {
        self.ratings.iter().filter(move |r| r.vendor_id == vendor_id)
    }

    fn aggregate(&self, vendor_id: VendorId) -> RatingAggregate {
        RatingAggregate::from_scores(self.ratings_for(vendor_id).map(|r| &r.scores))
    }

    /// Ratings for one vendor, newest first.
    fn history(&self, vendor_id: VendorId) -> Vec<Rating> {
        let mut history: Vec<Rating> = self.ratings_for(vendor_id).cloned().collect();
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        history
    }

    /// Stored vendor with its derived fields filled in.
    fn hydrate(&self, vendor: &Vendor) -> Vendor {
        let mut vendor = vendor.clone();
        vendor.rating_summary = self.aggregate(vendor.id);
        vendor
    }

    fn page<'a>(&self, vendors: impl Iterator<Item = &'a Vendor>, page: PageRequest) -> Vec<Vendor> {
        let mut vendors: Vec<&Vendor> = vendors.collect();
        vendors.sort_by(|a, b| newest_first(a, b));
        vendors
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .map(|v| self.hydrate(v))
            .collect()
    }
}

fn newest_first(a: &Vendor, b: &Vendor) -> Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

/// In-memory vendor and rating store.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    span: Span,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Span::none())
    }
}

impl InMemoryStore {
    /// Events are emitted as children of `span`.
    pub fn new(span: Span) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            span,
        }
    }

    fn read(&self) -> WaakyeResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| {
            tracing::error!(parent: &self.span, "in-memory store lock poisoned");
            StorageError::LockPoisoned.into()
        })
    }

    fn write(&self) -> WaakyeResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| {
            tracing::error!(parent: &self.span, "in-memory store lock poisoned");
            StorageError::LockPoisoned.into()
        })
    }

    /// Flip the verified flag. Verification is an administrative action
    /// outside the public API; this exists for seeding and tests.
    pub fn set_verified(&self, id: VendorId, verified: bool) -> WaakyeResult<bool> {
        let mut tables = self.write()?;
        match tables.vendors.get_mut(&id) {
            Some(vendor) => {
                vendor.is_verified = verified;
                vendor.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn vendor_count(&self) -> usize {
        self.read().map(|t| t.vendors.len()).unwrap_or(0)
    }

    pub fn rating_count(&self) -> usize {
        self.read().map(|t| t.ratings.len()).unwrap_or(0)
    }
}

#[async_trait]
impl VendorStore for InMemoryStore {
    async fn create_vendor(&self, new: &NewVendor) -> WaakyeResult<Vendor> {
        let now = Utc::now();
        let vendor = Vendor {
            id: VendorId::now_v7(),
            name: new.name.clone(),
            description: new.description.clone(),
            operating_hours: new.operating_hours.clone(),
            image_url: new.image_url.clone(),
            phone_number: new.phone_number.clone(),
            is_verified: false,
            location: Location {
                id: LocationId::now_v7(),
                street_address: new.location.street_address.clone(),
                city: new.location.city.clone(),
                region: new.location.region.clone(),
                landmark: new.location.landmark.clone(),
                latitude: new.location.coordinates.latitude(),
                longitude: new.location.coordinates.longitude(),
                created_at: now,
            },
            created_at: now,
            updated_at: now,
            rating_summary: RatingAggregate::empty(),
            distance_km: None,
            ratings: None,
        };

        self.write()?.vendors.insert(vendor.id, vendor.clone());
        tracing::debug!(parent: &self.span, vendor_id = %vendor.id, "vendor stored");
        Ok(vendor)
    }

    async fn get_vendor(
        &self,
        id: VendorId,
        history: RatingHistory,
    ) -> WaakyeResult<Option<Vendor>> {
        let tables = self.read()?;
        Ok(tables.vendors.get(&id).map(|stored| {
            let mut vendor = tables.hydrate(stored);
            if history == RatingHistory::Include {
                vendor.ratings = Some(tables.history(id));
            }
            vendor
        }))
    }

    async fn list_vendors(&self, page: PageRequest) -> WaakyeResult<Vec<Vendor>> {
        let tables = self.read()?;
        Ok(tables.page(tables.vendors.values(), page))
    }

    async fn count_vendors(&self) -> WaakyeResult<u64> {
        Ok(self.read()?.vendors.len() as u64)
    }

    async fn list_verified_vendors(&self, page: PageRequest) -> WaakyeResult<Vec<Vendor>> {
        let tables = self.read()?;
        Ok(tables.page(tables.vendors.values().filter(|v| v.is_verified), page))
    }

    async fn count_verified_vendors(&self) -> WaakyeResult<u64> {
        Ok(self.read()?.vendors.values().filter(|v| v.is_verified).count() as u64)
    }

    async fn find_nearby(
        &self,
        center: Coordinates,
        radius: SearchRadius,
    ) -> WaakyeResult<Vec<Vendor>> {
        let tables = self.read()?;
        let mut nearby: Vec<Vendor> = tables
            .vendors
            .values()
            .filter_map(|stored| {
                let distance = haversine_km(center, stored.location.coordinates());
                radius.contains(distance).then(|| {
                    let mut vendor = tables.hydrate(stored);
                    vendor.distance_km = Some(distance);
                    vendor
                })
            })
            .collect();

        nearby.sort_by(|a, b| {
            let da = a.distance_km.unwrap_or(f64::INFINITY);
            let db = b.distance_km.unwrap_or(f64::INFINITY);
            da.total_cmp(&db).then(a.id.cmp(&b.id))
        });
        Ok(nearby)
    }

    async fn top_rated(&self, limit: usize) -> WaakyeResult<Vec<Vendor>> {
        let tables = self.read()?;
        let mut rated: Vec<Vendor> = tables
            .vendors
            .values()
            .map(|stored| tables.hydrate(stored))
            .filter(|v| v.rating_summary.has_ratings())
            .collect();

        rated.sort_by(|a, b| {
            b.rating_summary
                .overall_rating
                .total_cmp(&a.rating_summary.overall_rating)
                .then(a.id.cmp(&b.id))
        });
        rated.truncate(limit);
        Ok(rated)
    }

    async fn health_check(&self) -> WaakyeResult<()> {
        self.read().map(|_| ())
    }
}

#[async_trait]
impl RatingStore for InMemoryStore {
    async fn submit_rating(&self, vendor_id: VendorId, new: &NewRating) -> WaakyeResult<Rating> {
        let rating = Rating {
            id: RatingId::now_v7(),
            vendor_id,
            scores: new.scores,
            comment: new.comment.clone(),
            created_at: Utc::now(),
        };
        self.write()?.ratings.push(rating.clone());
        tracing::debug!(parent: &self.span, %vendor_id, rating_id = %rating.id, "rating stored");
        Ok(rating)
    }

    async fn rating_summary(&self, vendor_id: VendorId) -> WaakyeResult<VendorRatings> {
        let tables = self.read()?;
        let comments = tables
            .history(vendor_id)
            .into_iter()
            .filter_map(|r| {
                r.comment.map(|comment| RatingComment {
                    comment,
                    created_at: r.created_at,
                })
            })
            .collect();
        Ok(VendorRatings {
            summary: tables.aggregate(vendor_id),
            comments,
        })
    }
}
