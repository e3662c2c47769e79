//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// How long shutdown waits for in-flight requests, in seconds
pub const DEFAULT_SHUTDOWN_GRACE_SECONDS: u64 = 5;

// =============================================================================
// Database
// =============================================================================

/// Default database connection URL (SQLite file, created if missing)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://users.db?mode=rwc";

/// Default upper bound on pooled connections
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// Cache
// =============================================================================

/// Default cache TTL in seconds (5 minutes)
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Upper bound on entries held by the in-process cache
pub const MEMORY_CACHE_MAX_CAPACITY: u64 = 10_000;

/// Cache key holding the serialized list of all users
pub const CACHE_KEY_ALL_USERS: &str = "users";

// =============================================================================
// Validation
// =============================================================================

/// Minimum age a user must have to register
pub const MIN_USER_AGE: i32 = 18;
