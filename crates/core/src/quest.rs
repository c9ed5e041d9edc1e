//! Quest definition rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What drives progress on a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestTrigger {
    /// Progress is reported explicitly through `/complete-quest`.
    #[default]
    Manual,
    /// Every successful login counts as one step.
    SignIn,
}

impl QuestTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::SignIn => "sign_in",
        }
    }
}

impl fmt::Display for QuestTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestTrigger {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "sign_in" => Ok(Self::SignIn),
            other => Err(CoreError::Validation(format!(
                "Unknown quest trigger '{other}'. Expected one of: manual, sign_in"
            ))),
        }
    }
}

/// Validate the fields of a quest definition.
pub fn validate_quest(name: &str, streak: i32, duplication: i32) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Quest name must not be empty".into()));
    }
    if streak < 1 {
        return Err(CoreError::Validation(format!(
            "streak must be at least 1, got {streak}"
        )));
    }
    if duplication < 1 {
        return Err(CoreError::Validation(format!(
            "duplication must be at least 1, got {duplication}"
        )));
    }
    Ok(())
}
