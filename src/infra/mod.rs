//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection, migrations and the user store
//! - Caching systems (Redis or in-process)
//! - The cache-aside repository tying the two together

pub mod cache;
pub mod db;
pub mod repositories;

pub use cache::{Cache, CacheError, CacheExt, MemoryCache, RedisCache};
pub use db::{Database, Migrator};
pub use repositories::{CachedUserRepository, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockCache;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
