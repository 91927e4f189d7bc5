//! Vendor Directory Service
//!
//! Orchestrates the stores and the vendor cache for every directory
//! operation. Handlers stay thin: parse, call one method here, wrap.
//!
//! Cache failures are logged and counted but never returned. The store is
//! the source of truth; the cache only saves a round trip.

use std::sync::Arc;

use tracing::Span;
use waakye_core::{
    Coordinates, EntityIdType, NewRating, NewVendor, Page, PageRequest, Rating, RatingScores,
    SearchRadius, Vendor, VendorId, VendorRatings, WaakyeError, WaakyeResult,
};
use waakye_storage::{CacheResult, RatingHistory, RatingStore, VendorCache, VendorStore};

use crate::telemetry::metrics::{CacheOutcome, METRICS};

/// How many vendors the top-rated listing returns.
pub const TOP_RATED_LIMIT: usize = 5;

/// A single-vendor read, flagged with where it was served from.
#[derive(Debug, Clone)]
pub struct VendorRead {
    pub vendor: Vendor,
    pub from_cache: bool,
}

#[derive(Clone)]
pub struct VendorDirectory {
    vendors: Arc<dyn VendorStore>,
    ratings: Arc<dyn RatingStore>,
    cache: Option<VendorCache>,
    span: Span,
}

fn record_lookup(backend: &str, outcome: CacheOutcome) {
    if let Ok(metrics) = METRICS.as_ref() {
        metrics.record_cache_lookup(backend, outcome);
    }
}

impl VendorDirectory {
    pub fn new(
        vendors: Arc<dyn VendorStore>,
        ratings: Arc<dyn RatingStore>,
        cache: Option<VendorCache>,
        span: Span,
    ) -> Self {
        Self {
            vendors,
            ratings,
            cache,
            span,
        }
    }

    pub fn cache(&self) -> Option<&VendorCache> {
        self.cache.as_ref()
    }

    /// Validate and store a new vendor with its location.
    pub async fn create_vendor(&self, vendor: NewVendor) -> WaakyeResult<Vendor> {
        vendor.validate()?;
        let created = self.vendors.create_vendor(&vendor).await?;
        tracing::info!(parent: &self.span, vendor_id = %created.id, name = %created.name, "vendor created");
        Ok(created)
    }

    /// Fetch one vendor, consulting the cache first.
    pub async fn get_vendor(&self, id: VendorId) -> WaakyeResult<VendorRead> {
        if id.is_nil() {
            return Err(WaakyeError::vendor_not_found(id.as_uuid()));
        }

        if let Some(vendor) = self.cached(id).await {
            return Ok(VendorRead {
                vendor,
                from_cache: true,
            });
        }

        let vendor = self
            .vendors
            .get_vendor(id, RatingHistory::Include)
            .await?
            .ok_or_else(|| WaakyeError::vendor_not_found(id.as_uuid()))?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(&vendor).await {
                tracing::warn!(parent: &self.span, vendor_id = %id, error = %e, "failed to populate vendor cache");
            }
        }

        Ok(VendorRead {
            vendor,
            from_cache: false,
        })
    }

    /// Cache lookup: `exists` first, then `get`. Any failure reads as a miss.
    async fn cached(&self, id: VendorId) -> Option<Vendor> {
        let cache = self.cache.as_ref()?;
        let backend = cache.backend_name();

        match cache.exists(id).await {
            Ok(true) => {}
            Ok(false) => {
                record_lookup(backend, CacheOutcome::Miss);
                return None;
            }
            Err(e) => {
                tracing::warn!(parent: &self.span, vendor_id = %id, error = %e, "vendor cache check failed");
                record_lookup(backend, CacheOutcome::Error);
                return None;
            }
        }

        match cache.get(id).await {
            Ok(Some(vendor)) => {
                tracing::debug!(parent: &self.span, vendor_id = %id, "vendor served from cache");
                record_lookup(backend, CacheOutcome::Hit);
                Some(vendor)
            }
            Ok(None) => {
                record_lookup(backend, CacheOutcome::Miss);
                None
            }
            Err(e) => {
                tracing::warn!(parent: &self.span, vendor_id = %id, error = %e, "vendor cache read failed");
                record_lookup(backend, CacheOutcome::Error);
                None
            }
        }
    }

    /// Newest vendors first.
    pub async fn list_vendors(&self, page: PageRequest) -> WaakyeResult<Page<Vendor>> {
        let items = self.vendors.list_vendors(page).await?;
        let total = self.vendors.count_vendors().await?;
        Ok(Page::new(items, page, total))
    }

    pub async fn list_verified_vendors(&self, page: PageRequest) -> WaakyeResult<Page<Vendor>> {
        let items = self.vendors.list_verified_vendors(page).await?;
        let total = self.vendors.count_verified_vendors().await?;
        Ok(Page::new(items, page, total))
    }

    /// Vendors within `radius` of `center`, nearest first. Never cached.
    pub async fn nearby_vendors(
        &self,
        center: Coordinates,
        radius: SearchRadius,
    ) -> WaakyeResult<Vec<Vendor>> {
        self.vendors.find_nearby(center, radius).await
    }

    pub async fn top_rated_vendors(&self) -> WaakyeResult<Vec<Vendor>> {
        self.vendors.top_rated(TOP_RATED_LIMIT).await
    }

    /// Store a rating for an existing vendor, then drop its cache entry so
    /// the next read recomputes the aggregate.
    pub async fn rate_vendor(
        &self,
        id: VendorId,
        scores: RatingScores,
        comment: Option<String>,
    ) -> WaakyeResult<Rating> {
        if id.is_nil() {
            return Err(WaakyeError::vendor_not_found(id.as_uuid()));
        }
        if self.vendors.get_vendor(id, RatingHistory::Omit).await?.is_none() {
            return Err(WaakyeError::vendor_not_found(id.as_uuid()));
        }

        let result = self
            .ratings
            .submit_rating(id, &NewRating::new(scores, comment))
            .await;
        if let Ok(metrics) = METRICS.as_ref() {
            metrics.record_rating(result.is_ok());
        }
        let rating = result?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.evict(id).await {
                // Staleness is bounded by the entry TTL.
                tracing::warn!(parent: &self.span, vendor_id = %id, error = %e, "failed to evict vendor cache entry");
            }
        }

        tracing::info!(parent: &self.span, vendor_id = %id, rating_id = %rating.id, "vendor rated");
        Ok(rating)
    }

    /// Aggregate and comments. Unknown vendors get the zero summary.
    pub async fn vendor_ratings(&self, id: VendorId) -> WaakyeResult<VendorRatings> {
        if id.is_nil() {
            return Err(WaakyeError::vendor_not_found(id.as_uuid()));
        }
        self.ratings.rating_summary(id).await
    }

    pub async fn ping_store(&self) -> WaakyeResult<()> {
        self.vendors.health_check().await
    }

    /// `None` when no cache is configured.
    pub async fn ping_cache(&self) -> Option<CacheResult<()>> {
        let cache = self.cache.as_ref()?;
        Some(cache.ping().await)
    }
}
