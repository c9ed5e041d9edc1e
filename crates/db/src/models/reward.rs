//! Reward entity model and DTOs.

use questforge_core::error::CoreError;
use questforge_core::reward::{Grant, RewardItem};
use questforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `rewards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reward {
    #[serde(rename = "reward_id")]
    pub id: DbId,
    pub name: String,
    pub item: String,
    pub qty: i64,
    pub created_at: Timestamp,
}

impl Reward {
    /// The payout this reward represents.
    pub fn grant(&self) -> Result<Grant, CoreError> {
        Ok(Grant {
            item: self.item.parse::<RewardItem>()?,
            qty: self.qty,
        })
    }
}

/// DTO for creating a new reward.
#[derive(Debug)]
pub struct CreateReward {
    pub name: String,
    pub item: RewardItem,
    pub qty: i64,
}
