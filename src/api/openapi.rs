//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::api::handlers::{health_handler, user_handler};
use crate::domain::{NewUser, User};

/// OpenAPI documentation for the user registry
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Registry",
        version = "0.1.0",
        description = "User registration and listing backed by a cache-aside repository"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        user_handler::create_user,
        user_handler::list_users,
        health_handler::health,
    ),
    components(
        schemas(
            User,
            NewUser,
            health_handler::HealthResponse,
            health_handler::ServiceHealth,
            health_handler::ServiceStatus,
        )
    ),
    tags(
        (name = "Users", description = "User registration and listing"),
        (name = "Health", description = "Dependency connectivity")
    )
)]
pub struct ApiDoc;
