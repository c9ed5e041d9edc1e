//! User-quest assignment model.

use questforge_core::error::CoreError;
use questforge_core::progress::QuestStatus;
use questforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_quests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserQuest {
    #[serde(rename = "user_quest_id")]
    pub id: DbId,
    pub user_id: DbId,
    pub quest_id: DbId,
    pub status: String,
    pub progress: i32,
    pub assigned_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub claimed_at: Option<Timestamp>,
}

impl UserQuest {
    pub fn status(&self) -> Result<QuestStatus, CoreError> {
        self.status.parse()
    }
}

/// An assignment joined with the quest fields a client needs to render it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserQuestDetail {
    #[serde(rename = "user_quest_id")]
    pub id: DbId,
    pub user_id: DbId,
    pub quest_id: DbId,
    pub name: String,
    pub description: String,
    pub status: String,
    pub progress: i32,
    pub streak: i32,
    pub duplication: i32,
    pub auto_claim: bool,
    pub assigned_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub claimed_at: Option<Timestamp>,
}
