//! Process-local cache backend.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use ::async_trait::async_trait;
use tokio::time::Instant;

use super::traits::{CacheBackend, CacheError, CacheResult};

#[derive(Debug)]
struct Entry {
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
    value: Vec<u8>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// HashMap-backed cache. Expiry is checked on read, and expired entries are
/// dropped the next time they are written or deleted.
#[derive(Debug, Default)]
pub struct MemoryCacheBackend {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        let now = Instant::now();
        Ok(entries.get(key).is_some_and(|e| e.is_live(now)))
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        let now = Instant::now();
        Ok(entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        let now = Instant::now();
        entries.retain(|_, e| e.is_live(now));
        entries.insert(
            key.to_string(),
            Entry {
                expires_at: now.checked_add(ttl),
                value,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }

    async fn ping(&self) -> CacheResult<()> {
        self.entries
            .read()
            .map(|_| ())
            .map_err(|_| CacheError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() -> CacheResult<()> {
        let backend = MemoryCacheBackend::new();
        assert!(!backend.exists("vendor:a").await?);

        backend.set("vendor:a", b"payload".to_vec(), Duration::from_secs(60)).await?;
        assert!(backend.exists("vendor:a").await?);
        assert_eq!(backend.get("vendor:a").await?, Some(b"payload".to_vec()));

        backend.delete("vendor:a").await?;
        assert!(!backend.exists("vendor:a").await?);
        assert_eq!(backend.get("vendor:a").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() -> CacheResult<()> {
        let backend = MemoryCacheBackend::new();
        backend.delete("vendor:missing").await
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() -> CacheResult<()> {
        let backend = MemoryCacheBackend::new();
        backend.set("vendor:a", b"v".to_vec(), Duration::from_secs(60)).await?;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(backend.exists("vendor:a").await?);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!backend.exists("vendor:a").await?);
        assert_eq!(backend.get("vendor:a").await?, None);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_purges_expired_entries() -> CacheResult<()> {
        let backend = MemoryCacheBackend::new();
        backend.set("vendor:old", b"v".to_vec(), Duration::from_secs(1)).await?;
        tokio::time::advance(Duration::from_secs(5)).await;
        backend.set("vendor:new", b"v".to_vec(), Duration::from_secs(60)).await?;
        assert_eq!(backend.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_never_expires() -> CacheResult<()> {
        let backend = MemoryCacheBackend::new();
        backend
            .set("vendor:a", b"v".to_vec(), Duration::from_secs(u64::MAX))
            .await?;
        assert!(backend.exists("vendor:a").await?);
        assert_eq!(backend.get("vendor:a").await?, Some(b"v".to_vec()));

        backend.set("vendor:b", b"v".to_vec(), Duration::from_secs(60)).await?;
        assert_eq!(backend.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() -> CacheResult<()> {
        let backend = MemoryCacheBackend::new();
        backend.set("k", b"one".to_vec(), Duration::from_secs(60)).await?;
        backend.set("k", b"two".to_vec(), Duration::from_secs(60)).await?;
        assert_eq!(backend.get("k").await?, Some(b"two".to_vec()));
        Ok(())
    }
}
