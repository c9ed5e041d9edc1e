//! Repository for the `user_quests` table (quest assignments).

use questforge_core::progress::{QuestStatus, Step};
use questforge_core::reward::Grant;
use questforge_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::user_quest::{UserQuest, UserQuestDetail};
use crate::repositories::UserRepo;
use crate::NOW_SQL;

const COLUMNS: &str =
    "id, user_id, quest_id, status, progress, assigned_at, completed_at, claimed_at";

const SELECT_DETAIL: &str = "SELECT uq.id, uq.user_id, uq.quest_id, q.name, q.description, \
                                    uq.status, uq.progress, q.streak, q.duplication, \
                                    q.auto_claim, uq.assigned_at, uq.completed_at, uq.claimed_at \
                             FROM user_quests uq JOIN quests q ON q.id = uq.quest_id";

/// Provides assignment and progression operations for user quests.
pub struct UserQuestRepo;

impl UserQuestRepo {
    /// Create a new `in_progress` assignment with zero progress.
    ///
    /// The partial unique index `uq_user_quests_active` rejects a second
    /// unclaimed assignment for the same user and quest.
    pub async fn assign(
        pool: &SqlitePool,
        user_id: DbId,
        quest_id: DbId,
    ) -> Result<UserQuest, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_quests (user_id, quest_id, status, progress)
             VALUES (?1, ?2, 'in_progress', 0)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserQuest>(&query)
            .bind(user_id)
            .bind(quest_id)
            .fetch_one(pool)
            .await
    }

    /// Find the unclaimed assignment of a quest to a user, if any.
    pub async fn find_active(
        pool: &SqlitePool,
        user_id: DbId,
        quest_id: DbId,
    ) -> Result<Option<UserQuest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_quests
             WHERE user_id = ?1 AND quest_id = ?2 AND status <> 'claimed'"
        );
        sqlx::query_as::<_, UserQuest>(&query)
            .bind(user_id)
            .bind(quest_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the most recent assignment of a quest to a user, in any status.
    pub async fn find_latest(
        pool: &SqlitePool,
        user_id: DbId,
        quest_id: DbId,
    ) -> Result<Option<UserQuest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_quests
             WHERE user_id = ?1 AND quest_id = ?2
             ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, UserQuest>(&query)
            .bind(user_id)
            .bind(quest_id)
            .fetch_optional(pool)
            .await
    }

    /// Count every assignment of a quest to a user, claimed ones included.
    pub async fn count_for(
        pool: &SqlitePool,
        user_id: DbId,
        quest_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_quests WHERE user_id = ?1 AND quest_id = ?2")
            .bind(user_id)
            .bind(quest_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_detail(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<UserQuestDetail>, sqlx::Error> {
        let query = format!("{SELECT_DETAIL} WHERE uq.id = ?1");
        sqlx::query_as::<_, UserQuestDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's assignments, oldest first.
    pub async fn list_details_for_user(
        pool: &SqlitePool,
        user_id: DbId,
    ) -> Result<Vec<UserQuestDetail>, sqlx::Error> {
        let query = format!("{SELECT_DETAIL} WHERE uq.user_id = ?1 ORDER BY uq.id");
        sqlx::query_as::<_, UserQuestDetail>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List every assignment, grouped by user.
    pub async fn list_all_details(pool: &SqlitePool) -> Result<Vec<UserQuestDetail>, sqlx::Error> {
        let query = format!("{SELECT_DETAIL} ORDER BY uq.user_id, uq.id");
        sqlx::query_as::<_, UserQuestDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Persist a progress step computed from `(from_status, from_progress)`.
    ///
    /// When the step grants a reward, `grant` is credited to the user in the
    /// same transaction. Returns `None` if the row no longer matches the
    /// state the step was computed from (a concurrent request got there
    /// first); nothing is written in that case.
    pub async fn apply_step(
        pool: &SqlitePool,
        id: DbId,
        from_status: QuestStatus,
        from_progress: i32,
        step: &Step,
        grant: Grant,
    ) -> Result<Option<UserQuest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE user_quests SET
                progress = ?1,
                status = ?2,
                completed_at = CASE WHEN ?2 <> 'in_progress' THEN {NOW_SQL} ELSE completed_at END,
                claimed_at = CASE WHEN ?2 = 'claimed' THEN {NOW_SQL} ELSE claimed_at END,
                updated_at = {NOW_SQL}
             WHERE id = ?3 AND status = ?4 AND progress = ?5
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, UserQuest>(&query)
            .bind(step.progress)
            .bind(step.status.as_str())
            .bind(id)
            .bind(from_status.as_str())
            .bind(from_progress)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(user_quest) = updated else {
            return Ok(None);
        };

        if step.grants_reward {
            UserRepo::credit(&mut *tx, user_quest.user_id, grant).await?;
        }

        tx.commit().await?;
        Ok(Some(user_quest))
    }

    /// Move a `completed` assignment to `claimed` and credit `grant`.
    ///
    /// Returns `None` if the assignment is not (or no longer) `completed`.
    pub async fn claim(
        pool: &SqlitePool,
        id: DbId,
        grant: Grant,
    ) -> Result<Option<UserQuest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE user_quests SET
                status = 'claimed',
                claimed_at = {NOW_SQL},
                updated_at = {NOW_SQL}
             WHERE id = ?1 AND status = 'completed'
             RETURNING {COLUMNS}"
        );
        let claimed = sqlx::query_as::<_, UserQuest>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(user_quest) = claimed else {
            return Ok(None);
        };

        UserRepo::credit(&mut *tx, user_quest.user_id, grant).await?;

        tx.commit().await?;
        Ok(Some(user_quest))
    }
}
