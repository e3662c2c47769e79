//! Cache-aside proxy in front of a [`UserRepository`].
//!
//! Reads try the cache first and fall back to the wrapped repository on any
//! cache error, repopulating the entry afterwards. Writes go to the wrapped
//! repository and then drop the cached list so the next read rebuilds it.
//! Concurrent misses may both hit the store and both repopulate; the last
//! write wins, which the TTL bounds.

use std::sync::Arc;

use async_trait::async_trait;

use super::UserRepository;
use crate::config::CACHE_KEY_ALL_USERS;
use crate::domain::{NewUser, User};
use crate::errors::AppResult;
use crate::infra::cache::{Cache, CacheExt};

/// [`UserRepository`] decorator that caches the full user list.
pub struct CachedUserRepository {
    inner: Arc<dyn UserRepository>,
    cache: Arc<dyn Cache>,
}

impl CachedUserRepository {
    pub fn new(inner: Arc<dyn UserRepository>, cache: Arc<dyn Cache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl UserRepository for CachedUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<i32> {
        let id = self.inner.create(user).await?;

        // A failed invalidation leaves a stale list until the TTL runs out
        match self.cache.delete(CACHE_KEY_ALL_USERS).await {
            Ok(()) => tracing::debug!(key = CACHE_KEY_ALL_USERS, "Cache invalidated"),
            Err(e) => tracing::warn!(
                key = CACHE_KEY_ALL_USERS,
                error = %e,
                "Failed to invalidate cache"
            ),
        }

        Ok(id)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        match self.cache.get_json::<Vec<User>>(CACHE_KEY_ALL_USERS).await {
            Ok(users) => {
                tracing::debug!(key = CACHE_KEY_ALL_USERS, "Cache hit");
                return Ok(users);
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(key = CACHE_KEY_ALL_USERS, "Cache miss");
            }
            Err(e) => {
                tracing::warn!(
                    key = CACHE_KEY_ALL_USERS,
                    error = %e,
                    "Cache read failed, falling back to store"
                );
            }
        }

        let users = self.inner.list().await?;
        self.cache.set_json(CACHE_KEY_ALL_USERS, &users).await;

        Ok(users)
    }
}
