//! User Registry - user registration and listing over HTTP
//!
//! Reads go through a cache-aside repository: the cache is consulted first
//! and the store is the fallback. Writes go to the store and invalidate the
//! cached user list.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities
//! - **services**: Validation and use cases
//! - **infra**: Database, cache and repositories
//! - **api**: HTTP handlers and routes
//! - **app**: Wiring and graceful shutdown
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use app::Application;
pub use config::Config;
pub use domain::{NewUser, User};
pub use errors::{AppError, AppResult};
pub use infra::{Cache, CachedUserRepository, UserRepository};
pub use services::{UserManager, UserService};
