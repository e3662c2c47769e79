//! In-process cache backed by Moka.
//!
//! Used when no Redis URL is configured, and by the integration tests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{future::Cache as MokaCache, Expiry};

use super::{Cache, CacheError, CacheResult};
use crate::config::MEMORY_CACHE_MAX_CAPACITY;

#[derive(Clone)]
struct Entry {
    bytes: Vec<u8>,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Thread-safe in-memory cache with per-entry expiration.
///
/// Cloning is cheap and clones share the same storage.
#[derive(Clone)]
pub struct MemoryCache {
    inner: MokaCache<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new(default_ttl: Duration) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(MEMORY_CACHE_MAX_CAPACITY)
            .expire_after(PerEntryTtl)
            .build();

        tracing::info!("In-memory cache initialized");

        Self { inner, default_ttl }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn set_raw(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        self.inner
            .insert(key.to_string(), Entry { bytes: value, ttl })
            .await;
    }

    async fn get_raw(&self, key: &str) -> CacheResult<Vec<u8>> {
        self.inner
            .get(key)
            .await
            .map(|entry| entry.bytes)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }

    fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set_raw("k", b"v".to_vec(), Duration::from_secs(60)).await;

        assert_eq!(cache.get_raw("k").await.unwrap(), b"v".to_vec());
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let err = cache.get_raw("missing").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set_raw("k", b"v".to_vec(), Duration::from_secs(60)).await;
        cache.delete("k").await.unwrap();

        assert!(cache.get_raw("k").await.unwrap_err().is_not_found());
        // Deleting an absent key is not an error
        assert!(cache.delete("k").await.is_ok());
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set_raw("k", b"v".to_vec(), Duration::from_millis(50)).await;
        assert!(cache.get_raw("k").await.is_ok());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get_raw("k").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set_raw("k", b"old".to_vec(), Duration::from_millis(50)).await;
        cache.set_raw("k", b"new".to_vec(), Duration::from_secs(60)).await;

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.get_raw("k").await.unwrap(), b"new".to_vec());
    }
}
