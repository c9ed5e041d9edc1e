//! Quest entity model and DTOs.

use questforge_core::error::CoreError;
use questforge_core::progress::QuestRules;
use questforge_core::quest::QuestTrigger;
use questforge_core::reward::{Grant, RewardItem};
use questforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A quest row joined with its reward.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quest {
    #[serde(rename = "quest_id")]
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub reward_id: DbId,
    pub reward_name: String,
    pub reward_item: String,
    pub reward_qty: i64,
    pub streak: i32,
    pub duplication: i32,
    pub auto_claim: bool,
    #[serde(rename = "trigger")]
    pub trigger_kind: String,
    pub created_at: Timestamp,
}

impl Quest {
    pub fn rules(&self) -> QuestRules {
        QuestRules {
            streak: self.streak,
            duplication: self.duplication,
            auto_claim: self.auto_claim,
        }
    }

    pub fn trigger(&self) -> Result<QuestTrigger, CoreError> {
        self.trigger_kind.parse()
    }

    /// The payout for completing this quest.
    pub fn grant(&self) -> Result<Grant, CoreError> {
        Ok(Grant {
            item: self.reward_item.parse::<RewardItem>()?,
            qty: self.reward_qty,
        })
    }
}

/// DTO for creating a new quest.
#[derive(Debug)]
pub struct CreateQuest {
    pub reward_id: DbId,
    pub name: String,
    pub description: String,
    pub auto_claim: bool,
    pub streak: i32,
    pub duplication: i32,
    pub trigger: QuestTrigger,
}
