//! Application state shared by all handlers.

use std::sync::Arc;

use crate::infra::{Cache, Database};
use crate::services::UserService;

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Validation service in front of the caching repository
    pub user_service: Arc<dyn UserService>,
    /// Cache backend, used for health reporting
    pub cache: Arc<dyn Cache>,
    /// Database handle, used for health reporting
    pub database: Arc<Database>,
}

impl AppState {
    /// Create new application state with manually injected services.
    pub fn new(
        user_service: Arc<dyn UserService>,
        cache: Arc<dyn Cache>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            user_service,
            cache,
            database,
        }
    }
}
