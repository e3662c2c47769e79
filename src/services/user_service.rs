//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.
//! Email uniqueness is left to the store; its conflict error passes through.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MIN_USER_AGE;
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user and return its id
    async fn create_user(&self, user: NewUser) -> AppResult<i32>;

    /// List all registered users
    async fn list_users(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, user: NewUser) -> AppResult<i32> {
        if !user.is_adult() {
            return Err(AppError::validation(format!(
                "User must be at least {} years old",
                MIN_USER_AGE
            )));
        }

        self.repo.create(user).await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use mockall::predicate::eq;

    fn new_user(age: i32) -> NewUser {
        NewUser {
            name: "Al".to_string(),
            password: "x".to_string(),
            email: "a@x.com".to_string(),
            age,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_minor_without_store_write() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let service = UserManager::new(Arc::new(repo));
        let result = service.create_user(new_user(17)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_accepts_minimum_age() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .with(eq(new_user(18)))
            .times(1)
            .returning(|_| Ok(1));

        let service = UserManager::new(Arc::new(repo));

        assert_eq!(service.create_user(new_user(18)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_propagates_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .returning(|_| Err(AppError::conflict("Email")));

        let service = UserManager::new(Arc::new(repo));
        let result = service.create_user(new_user(25)).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_is_passthrough() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .times(1)
            .returning(|| Ok(vec![new_user(21).with_id(1), new_user(30).with_id(2)]));

        let service = UserManager::new(Arc::new(repo));
        let users = service.list_users().await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[1].id, 2);
    }
}
