//! Repository for the `users` table.

use questforge_core::reward::Grant;
use questforge_core::types::DbId;
use questforge_core::user::UserStatus;
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::user::{CreateUser, User};
use crate::NOW_SQL;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, status, gold, diamonds, login_count, \
                       created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, status, gold)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(input.status.as_str())
            .bind(input.gold)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = ?1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List all users in signup order.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Record a successful login: bump `login_count` and promote `new` users
    /// to `not_new`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn record_login(pool: &SqlitePool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                login_count = login_count + 1,
                status = CASE WHEN status = 'new' THEN 'not_new' ELSE status END,
                updated_at = {NOW_SQL}
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set a user's account status.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &SqlitePool,
        id: DbId,
        status: UserStatus,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET status = ?2, updated_at = {NOW_SQL}
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Credit a reward to a user's balance on an open connection.
    ///
    /// Meant to run inside the caller's transaction. Fails with
    /// [`sqlx::Error::RowNotFound`] if the user does not exist. A credit that
    /// would overflow the balance writes `-1` instead, which trips the
    /// balance CHECK constraint. Either way the surrounding transaction
    /// rolls back.
    pub(crate) async fn credit(
        conn: &mut SqliteConnection,
        user_id: DbId,
        grant: Grant,
    ) -> Result<(), sqlx::Error> {
        let column = grant.item.balance_column();
        let query = format!(
            "UPDATE users SET
                {column} = CASE WHEN ?1 <= {max} - {column} THEN {column} + ?1 ELSE -1 END,
                updated_at = {NOW_SQL}
             WHERE id = ?2",
            max = i64::MAX,
        );
        let result = sqlx::query(&query)
            .bind(grant.qty)
            .bind(user_id)
            .execute(conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        tracing::debug!(user_id, item = %grant.item, qty = grant.qty, "Reward credited");
        Ok(())
    }
}
