//! Cache backend trait and shared cache types.

use std::time::Duration;

use ::async_trait::async_trait;

/// Error type for cache operations.
///
/// Cache failures never fail a request on their own; callers log them and
/// fall back to the store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The remote or embedded backend rejected the operation.
    #[error("{backend} cache error: {reason}")]
    Backend { backend: &'static str, reason: String },

    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open database: {0}")]
    DbOpen(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache lock poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Byte-oriented key/value cache with per-entry expiry.
///
/// Backends only move bytes; encoding lives in
/// [`VendorCache`](super::VendorCache). Expired entries must be reported as
/// absent by both `exists` and `get`.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;

    async fn exists(&self, key: &str) -> CacheResult<bool>;

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Connectivity check used by the readiness endpoint.
    async fn ping(&self) -> CacheResult<()>;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Lookups that failed at the backend and fell through to the store.
    pub errors: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
