//! Vendor cache and its pluggable backends.
//!
//! [`VendorCache`] owns key format, encoding and TTL. Backends only store
//! bytes with an expiry: [`MemoryCacheBackend`] for single-process use,
//! [`LmdbCacheBackend`] for a cache that survives restarts and
//! [`RedisCacheBackend`] for one shared across replicas.

pub mod lmdb_backend;
pub mod memory_backend;
pub mod read_through;
pub mod redis_backend;
pub mod traits;

pub use lmdb_backend::LmdbCacheBackend;
pub use memory_backend::MemoryCacheBackend;
pub use read_through::{vendor_key, CacheConfig, VendorCache, DEFAULT_VENDOR_TTL};
pub use redis_backend::RedisCacheBackend;
pub use traits::{CacheBackend, CacheError, CacheResult, CacheStats};
