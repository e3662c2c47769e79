//! Cache abstraction.
//!
//! Values are opaque byte blobs with a per-entry TTL. Writes are best-effort:
//! a failed `set` is logged by the backend and never reaches the caller.
//! Reads and deletes report failures, and a missing or expired key is
//! reported as [`CacheError::NotFound`].

mod memory;
mod redis_cache;

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use self::memory::MemoryCache;
pub use self::redis_cache::RedisCache;

/// Cache-level errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent or expired
    #[error("key {0} not found")]
    NotFound(String),

    #[error("failed to decode key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Transport or server failure
    #[error("cache backend error: {0}")]
    Backend(String),
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value store with expiration.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Cache: Send + Sync {
    /// Store raw bytes under `key` for `ttl`. Failures are logged, not returned.
    async fn set_raw(&self, key: &str, value: Vec<u8>, ttl: Duration);

    /// Fetch raw bytes stored under `key`.
    async fn get_raw(&self, key: &str) -> CacheResult<Vec<u8>>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Check backend connectivity.
    async fn ping(&self) -> CacheResult<()>;

    /// Expiration applied by `set_json`.
    fn default_ttl(&self) -> Duration;
}

/// JSON helpers available on every [`Cache`].
#[async_trait]
pub trait CacheExt: Cache {
    /// Fetch and decode a JSON value.
    async fn get_json<T>(&self, key: &str) -> CacheResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let bytes = self.get_raw(key).await?;
        serde_json::from_slice(&bytes).map_err(|source| CacheError::Decode {
            key: key.to_string(),
            source,
        })
    }

    /// Encode and store a JSON value with the default TTL.
    async fn set_json<T>(&self, key: &str, value: &T)
    where
        T: Serialize + Sync,
    {
        self.set_json_with_ttl(key, value, self.default_ttl()).await
    }

    /// Encode and store a JSON value with a custom TTL.
    async fn set_json_with_ttl<T>(&self, key: &str, value: &T, ttl: Duration)
    where
        T: Serialize + Sync,
    {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.set_raw(key, bytes, ttl).await,
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to encode cache value"),
        }
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}
