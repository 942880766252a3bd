//! User entity model and DTOs.

use devcamper_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and reset token hash -- NEVER serialize this
/// to API responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    pub reset_password_token: Option<String>,
    pub reset_password_expire: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Safe user representation for API responses (no credentials).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
}

/// DTO for updating an existing user. All fields are optional.
///
/// Passwords go through [`crate::store::UserStore::set_password`] instead.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// A pending password reset: the hashed token and when it stops working.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub token_hash: String,
    pub expires_at: Timestamp,
}
