//! Waakye Storage - Store Traits, In-Memory Store and Vendor Cache
//!
//! Defines the storage abstraction the API orchestrates. The Postgres
//! implementation lives in waakye-api next to its connection pool.

pub mod cache;
pub mod memory;
pub mod traits;

pub use cache::{
    CacheBackend, CacheConfig, CacheError, CacheResult, CacheStats, LmdbCacheBackend,
    MemoryCacheBackend, RedisCacheBackend, VendorCache, DEFAULT_VENDOR_TTL,
};
pub use memory::InMemoryStore;
pub use traits::{RatingHistory, RatingStore, VendorStore};
