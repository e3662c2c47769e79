//! Domain layer - Core business entities.

mod user;

pub use user::{NewUser, User};
