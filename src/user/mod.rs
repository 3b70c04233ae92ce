//! User records: persistence hooks, registration rules and errors.

pub mod entity;
pub mod error;
pub mod registration;

pub use error::*;
pub use registration::{validate_registration, validate_user_patch};

/// Collection of every registered user.
pub const USERS_KEY: &str = "users";
/// Single saved copy of whoever logged in last.
pub const CURRENT_USER_KEY: &str = "currentUser";
