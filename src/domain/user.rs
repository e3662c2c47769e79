//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::MIN_USER_AGE;

/// User domain entity
///
/// The password is kept exactly as submitted and is part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-generated identifier
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Al")]
    pub name: String,
    #[schema(example = "x")]
    pub password: String,
    /// Unique across all users
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = 21)]
    pub age: i32,
}

/// Registration payload (a user without an id yet)
///
/// Absent fields decode to their zero value; the age rule and the store
/// reject what is left incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct NewUser {
    #[schema(example = "Al")]
    pub name: String,
    #[schema(example = "x")]
    pub password: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = 21)]
    pub age: i32,
}

impl NewUser {
    /// Whether the user is old enough to register
    pub fn is_adult(&self) -> bool {
        self.age >= MIN_USER_AGE
    }

    /// Attach the identifier assigned by the store
    pub fn with_id(self, id: i32) -> User {
        User {
            id,
            name: self.name,
            password: self.password,
            email: self.email,
            age: self.age,
        }
    }
}
