//! User entity model and DTOs.

use questforge_core::error::CoreError;
use questforge_core::types::{DbId, Timestamp};
use questforge_core::user::UserStatus;
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub status: String,
    pub gold: i64,
    pub diamonds: i64,
    pub login_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn status(&self) -> Result<UserStatus, CoreError> {
        self.status.parse()
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: DbId,
    pub username: String,
    pub status: String,
    pub gold: i64,
    pub diamonds: i64,
    pub login_count: i64,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            status: user.status,
            gold: user.gold,
            diamonds: user.diamonds,
            login_count: user.login_count,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub status: UserStatus,
    /// Opening gold balance (the signup bonus).
    pub gold: i64,
}
