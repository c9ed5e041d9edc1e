//! User account status and username rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Minimum username length in characters.
pub const MIN_USERNAME_LEN: usize = 3;
/// Maximum username length in characters.
pub const MAX_USERNAME_LEN: usize = 32;

/// Lifecycle status of a user account.
///
/// Stored as lowercase snake_case text in the `users.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Freshly signed up, has not logged in yet.
    #[default]
    New,
    /// Has logged in at least once.
    NotNew,
    /// Barred from logging in and from progressing quests.
    Banned,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::NotNew => "not_new",
            Self::Banned => "banned",
        }
    }

    pub fn is_banned(self) -> bool {
        self == Self::Banned
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "not_new" => Ok(Self::NotNew),
            "banned" => Ok(Self::Banned),
            other => Err(CoreError::Validation(format!(
                "Unknown user status '{other}'. Expected one of: new, not_new, banned"
            ))),
        }
    }
}

/// Validate a username: 3-32 characters from `[A-Za-z0-9_.-]`.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Username must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"
        )));
    }
    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
    {
        return Err(CoreError::Validation(format!(
            "Username contains invalid character '{bad}'"
        )));
    }
    Ok(())
}
