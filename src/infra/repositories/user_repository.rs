//! User repository implementation backed by SeaORM.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, SqlErr};

use super::entities::{user, UserActiveModel, UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return the generated id.
    ///
    /// Fails with [`AppError::Conflict`] when the email is already taken.
    async fn create(&self, user: NewUser) -> AppResult<i32>;

    /// List all users in ascending id order
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository over the `users` table
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, user: NewUser) -> AppResult<i32> {
        let active_model = UserActiveModel {
            name: Set(user.name),
            password: Set(user.password),
            email: Set(user.email),
            age: Set(user.age),
            ..Default::default()
        };

        let result = UserEntity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(insert_error)?;

        tracing::debug!(id = result.last_insert_id, "User row inserted");
        Ok(result.last_insert_id)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}

/// Surface unique-email violations as conflicts; everything else is a storage failure.
fn insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Email"),
        _ => AppError::from(err),
    }
}
