//! Repository for the `quests` table.
//!
//! Quests are always read joined with their reward so callers get the
//! reward name, item and quantity inline.

use questforge_core::quest::QuestTrigger;
use questforge_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::quest::{CreateQuest, Quest};

const SELECT_JOINED: &str = "SELECT q.id, q.name, q.description, q.reward_id, \
                                    r.name AS reward_name, r.item AS reward_item, \
                                    r.qty AS reward_qty, q.streak, q.duplication, \
                                    q.auto_claim, q.trigger_kind, q.created_at \
                             FROM quests q JOIN rewards r ON r.id = q.reward_id";

/// Provides CRUD operations for quests.
pub struct QuestRepo;

impl QuestRepo {
    /// Insert a new quest, returning it joined with its reward.
    ///
    /// Fails with a foreign-key violation if `reward_id` does not exist.
    pub async fn create(pool: &SqlitePool, input: &CreateQuest) -> Result<Quest, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO quests
                (reward_id, name, description, auto_claim, streak, duplication, trigger_kind)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id",
        )
        .bind(input.reward_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.auto_claim)
        .bind(input.streak)
        .bind(input.duplication)
        .bind(input.trigger.as_str())
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!("{SELECT_JOINED} WHERE q.id = ?1");
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Quest>, sqlx::Error> {
        let query = format!("{SELECT_JOINED} ORDER BY q.id");
        sqlx::query_as::<_, Quest>(&query).fetch_all(pool).await
    }

    /// List quests driven by the given trigger, in creation order.
    pub async fn list_by_trigger(
        pool: &SqlitePool,
        trigger: QuestTrigger,
    ) -> Result<Vec<Quest>, sqlx::Error> {
        let query = format!("{SELECT_JOINED} WHERE q.trigger_kind = ?1 ORDER BY q.id");
        sqlx::query_as::<_, Quest>(&query)
            .bind(trigger.as_str())
            .fetch_all(pool)
            .await
    }
}
