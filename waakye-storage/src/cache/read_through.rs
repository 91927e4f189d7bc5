//! Vendor-by-id cache used in front of the store.
//!
//! Entries are JSON-encoded [`Vendor`] values keyed by `vendor:{id}`. An
//! entry that no longer decodes is treated as a miss, so a schema change
//! degrades to store reads instead of errors.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::Span;
use waakye_core::{Vendor, VendorId};

use super::traits::{CacheBackend, CacheResult, CacheStats};

/// Default lifetime of a cached vendor.
pub const DEFAULT_VENDOR_TTL: Duration = Duration::from_secs(60);

/// Configuration for the vendor cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL applied to every entry written by [`VendorCache::set`].
    pub entry_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            entry_ttl: DEFAULT_VENDOR_TTL,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl = ttl;
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
    evictions: AtomicU64,
}

/// Cache key for a single vendor.
pub fn vendor_key(id: VendorId) -> String {
    format!("vendor:{id}")
}

/// Typed vendor cache over any [`CacheBackend`].
#[derive(Clone)]
pub struct VendorCache {
    backend: Arc<dyn CacheBackend>,
    config: CacheConfig,
    counters: Arc<Counters>,
    span: Span,
}

impl VendorCache {
    pub fn new(backend: Arc<dyn CacheBackend>, config: CacheConfig, span: Span) -> Self {
        Self {
            backend,
            config,
            counters: Arc::new(Counters::default()),
            span,
        }
    }

    /// Create a vendor cache with the default TTL and no parent span.
    pub fn with_defaults(backend: Arc<dyn CacheBackend>) -> Self {
        Self::new(backend, CacheConfig::default(), Span::none())
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub async fn exists(&self, id: VendorId) -> CacheResult<bool> {
        self.backend.exists(&vendor_key(id)).await
    }

    /// Cached vendor, or `None` on a miss. Hits and misses are counted here;
    /// backend failures are counted and returned.
    pub async fn get(&self, id: VendorId) -> CacheResult<Option<Vendor>> {
        let key = vendor_key(id);
        let bytes = match self.backend.get(&key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        let vendor = bytes.and_then(|bytes| match serde_json::from_slice::<Vendor>(&bytes) {
            Ok(vendor) => Some(vendor),
            Err(e) => {
                tracing::warn!(parent: &self.span, %key, error = %e, "undecodable cache entry");
                None
            }
        });

        let counter = if vendor.is_some() {
            &self.counters.hits
        } else {
            &self.counters.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(vendor)
    }

    pub async fn set(&self, vendor: &Vendor) -> CacheResult<()> {
        let bytes = serde_json::to_vec(vendor)?;
        self.backend
            .set(&vendor_key(vendor.id), bytes, self.config.entry_ttl)
            .await
    }

    pub async fn evict(&self, id: VendorId) -> CacheResult<()> {
        self.backend.delete(&vendor_key(id)).await?;
        self.counters.evictions.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub async fn ping(&self) -> CacheResult<()> {
        self.backend.ping().await
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }
}
