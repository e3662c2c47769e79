//! Redis cache implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use super::{Cache, CacheError, CacheResult};

/// Redis-backed cache with a managed, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    /// Connect to Redis.
    pub async fn connect(url: &str, default_ttl: Duration) -> CacheResult<Self> {
        let client = Client::open(url).map_err(cache_error)?;
        let connection = ConnectionManager::new(client).await.map_err(cache_error)?;

        tracing::info!("Redis cache connected");

        Ok(Self {
            connection,
            default_ttl,
        })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn set_raw(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        let mut conn = self.connection.clone();

        if let Err(e) = conn.pset_ex::<_, _, ()>(key, value, ttl_millis(ttl)).await {
            tracing::warn!(key = %key, error = %e, "Failed to write cache entry");
        }
    }

    async fn get_raw(&self, key: &str) -> CacheResult<Vec<u8>> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(cache_error)?;

        value.ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(key).await.map_err(cache_error)
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

/// Expiry argument for PSETEX, which rejects zero.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// Convert Redis error to CacheError.
fn cache_error(e: RedisError) -> CacheError {
    tracing::error!("Redis error: {}", e);
    CacheError::Backend(e.to_string())
}
