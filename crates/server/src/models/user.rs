//! Admin user domain type.

use chrono::{DateTime, Utc};

use atelie_core::{Email, UserId};

/// An admin account.
///
/// Created once at bootstrap; there is no self-service registration. The
/// password hash is deliberately not part of this type - it only surfaces
/// in [`crate::db::users::UserRepository::get_password_hash`].
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
