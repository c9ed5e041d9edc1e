//! Reward items and reward definition rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Currency a reward pays out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardItem {
    Gold,
    Diamond,
}

impl RewardItem {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Diamond => "diamond",
        }
    }

    /// Name of the `users` balance column credited by this item.
    pub fn balance_column(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Diamond => "diamonds",
        }
    }
}

impl fmt::Display for RewardItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardItem {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gold" => Ok(Self::Gold),
            "diamond" | "diamonds" => Ok(Self::Diamond),
            other => Err(CoreError::Validation(format!(
                "Unknown reward item '{other}'. Expected one of: gold, diamond"
            ))),
        }
    }
}

/// Largest quantity a single reward may pay out.
///
/// Mirrored by the `rewards.qty` CHECK constraint.
pub const MAX_REWARD_QTY: i64 = 1_000_000;

/// A concrete payout: `qty` units of `item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub item: RewardItem,
    pub qty: i64,
}

/// Validate the fields of a reward definition.
pub fn validate_reward(name: &str, qty: i64) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Reward name must not be empty".into()));
    }
    if qty < 1 {
        return Err(CoreError::Validation(format!(
            "Reward quantity must be at least 1, got {qty}"
        )));
    }
    if qty > MAX_REWARD_QTY {
        return Err(CoreError::Validation(format!(
            "Reward quantity must be at most {MAX_REWARD_QTY}, got {qty}"
        )));
    }
    Ok(())
}
