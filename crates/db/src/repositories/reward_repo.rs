//! Repository for the `rewards` table.

use questforge_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::reward::{CreateReward, Reward};

const COLUMNS: &str = "id, name, item, qty, created_at";

/// Provides CRUD operations for rewards.
pub struct RewardRepo;

impl RewardRepo {
    /// Insert a new reward, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateReward) -> Result<Reward, sqlx::Error> {
        let query = format!(
            "INSERT INTO rewards (name, item, qty)
             VALUES (?1, ?2, ?3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reward>(&query)
            .bind(&input.name)
            .bind(input.item.as_str())
            .bind(input.qty)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Reward>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rewards WHERE id = ?1");
        sqlx::query_as::<_, Reward>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Reward>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rewards ORDER BY id");
        sqlx::query_as::<_, Reward>(&query).fetch_all(pool).await
    }
}
