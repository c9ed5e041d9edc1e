//! Quest assignment lifecycle: `in_progress` -> `completed` -> `claimed`.
//!
//! The functions here decide what a request is allowed to do to an
//! assignment. Persisting the outcome (and crediting rewards) is the caller's
//! job; repositories guard every write with the status the decision was based
//! on so concurrent requests cannot apply the same transition twice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MSG_ALREADY_ASSIGNED: &str = "Quest already assigned to user";
pub const MSG_DUPLICATION_LIMIT: &str = "Quest duplication limit reached for user";
pub const MSG_NOT_ASSIGNED: &str = "Quest not assigned to user";
pub const MSG_AWAITING_CLAIM: &str = "Quest already completed. Please claim your reward.";
pub const MSG_ALREADY_CLAIMED: &str = "Quest already claimed";
pub const MSG_NOT_COMPLETED: &str = "Quest not yet completed";

/// Status of a single user-quest assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    InProgress,
    Completed,
    Claimed,
}

impl QuestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Claimed => "claimed",
        }
    }

    /// An assignment is active until its reward has been claimed.
    pub fn is_active(self) -> bool {
        self != Self::Claimed
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "claimed" => Ok(Self::Claimed),
            other => Err(CoreError::Internal(format!(
                "Unknown quest status '{other}' in storage"
            ))),
        }
    }
}

/// Quest parameters relevant to progression.
#[derive(Debug, Clone, Copy)]
pub struct QuestRules {
    pub streak: i32,
    pub duplication: i32,
    pub auto_claim: bool,
}

/// Result of applying one progress step to an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub progress: i32,
    pub status: QuestStatus,
    /// `true` when this step moved the assignment to `claimed`, so the
    /// reward must be credited together with the status change.
    pub grants_reward: bool,
}

impl Step {
    pub fn completed_now(&self) -> bool {
        self.status != QuestStatus::InProgress
    }
}

/// Decide whether a new assignment may be created.
///
/// `has_active` is whether an unclaimed assignment already exists;
/// `total_assignments` counts every assignment of the quest to the user.
pub fn check_assignable(
    rules: &QuestRules,
    has_active: bool,
    total_assignments: i64,
) -> Result<(), CoreError> {
    if has_active {
        return Err(CoreError::Conflict(MSG_ALREADY_ASSIGNED.into()));
    }
    if total_assignments >= i64::from(rules.duplication) {
        return Err(CoreError::Validation(MSG_DUPLICATION_LIMIT.into()));
    }
    Ok(())
}

/// Apply one progress step to an assignment in `status` with `progress`.
pub fn advance(
    rules: &QuestRules,
    status: QuestStatus,
    progress: i32,
) -> Result<Step, CoreError> {
    match status {
        QuestStatus::Claimed => Err(CoreError::Conflict(MSG_ALREADY_CLAIMED.into())),
        QuestStatus::Completed => Err(CoreError::Conflict(MSG_AWAITING_CLAIM.into())),
        QuestStatus::InProgress => {
            let progress = (progress + 1).min(rules.streak);
            if progress < rules.streak {
                return Ok(Step {
                    progress,
                    status: QuestStatus::InProgress,
                    grants_reward: false,
                });
            }
            let status = if rules.auto_claim {
                QuestStatus::Claimed
            } else {
                QuestStatus::Completed
            };
            Ok(Step {
                progress,
                status,
                grants_reward: rules.auto_claim,
            })
        }
    }
}

/// Decide whether the reward of an assignment in `status` may be claimed.
pub fn check_claimable(status: QuestStatus) -> Result<(), CoreError> {
    match status {
        QuestStatus::Completed => Ok(()),
        QuestStatus::InProgress => Err(CoreError::Validation(MSG_NOT_COMPLETED.into())),
        QuestStatus::Claimed => Err(CoreError::Conflict(MSG_ALREADY_CLAIMED.into())),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn rules(streak: i32, duplication: i32, auto_claim: bool) -> QuestRules {
        QuestRules {
            streak,
            duplication,
            auto_claim,
        }
    }

    #[test]
    fn steps_until_streak_then_completes() {
        let r = rules(3, 1, false);
        let s1 = advance(&r, QuestStatus::InProgress, 0).unwrap();
        assert_eq!(s1.progress, 1);
        assert_eq!(s1.status, QuestStatus::InProgress);
        assert!(!s1.completed_now());

        let s2 = advance(&r, s1.status, s1.progress).unwrap();
        let s3 = advance(&r, s2.status, s2.progress).unwrap();
        assert_eq!(s3.progress, 3);
        assert_eq!(s3.status, QuestStatus::Completed);
        assert!(!s3.grants_reward);
        assert!(s3.completed_now());
    }

    #[test]
    fn auto_claim_goes_straight_to_claimed() {
        let step = advance(&rules(1, 1, true), QuestStatus::InProgress, 0).unwrap();
        assert_eq!(step.status, QuestStatus::Claimed);
        assert!(step.grants_reward);
    }

    #[test]
    fn progress_never_exceeds_streak() {
        let step = advance(&rules(2, 1, false), QuestStatus::InProgress, 7).unwrap();
        assert_eq!(step.progress, 2);
    }

    #[test]
    fn cannot_step_finished_assignments() {
        let r = rules(1, 1, false);
        assert_matches!(
            advance(&r, QuestStatus::Completed, 1),
            Err(CoreError::Conflict(msg)) if msg == MSG_AWAITING_CLAIM
        );
        assert_matches!(
            advance(&r, QuestStatus::Claimed, 1),
            Err(CoreError::Conflict(msg)) if msg == MSG_ALREADY_CLAIMED
        );
    }

    #[test]
    fn assignment_respects_active_and_duplication() {
        let r = rules(3, 2, false);
        assert!(check_assignable(&r, false, 0).is_ok());
        assert!(check_assignable(&r, false, 1).is_ok());
        assert_matches!(check_assignable(&r, true, 1), Err(CoreError::Conflict(_)));
        assert_matches!(
            check_assignable(&r, false, 2),
            Err(CoreError::Validation(msg)) if msg == MSG_DUPLICATION_LIMIT
        );
    }

    #[test]
    fn only_completed_assignments_are_claimable() {
        assert!(check_claimable(QuestStatus::Completed).is_ok());
        assert_matches!(
            check_claimable(QuestStatus::InProgress),
            Err(CoreError::Validation(_))
        );
        assert_matches!(check_claimable(QuestStatus::Claimed), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn claimed_is_the_only_inactive_status() {
        assert!(QuestStatus::InProgress.is_active());
        assert!(QuestStatus::Completed.is_active());
        assert!(!QuestStatus::Claimed.is_active());
    }
}
