//! Sign-in quest tracking.
//!
//! Every successful login counts as one progress step on each quest whose
//! trigger is `sign_in`. Missing assignments are created on the fly while the
//! duplication limit allows it. Tracking is best-effort: a failure is logged
//! and never turns a valid login into an error.

use questforge_core::progress::{
    advance, check_assignable, QuestStatus, MSG_AWAITING_CLAIM, MSG_DUPLICATION_LIMIT,
};
use questforge_core::quest::QuestTrigger;
use questforge_core::types::DbId;
use questforge_db::models::quest::Quest;
use questforge_db::models::user_quest::UserQuest;
use questforge_db::repositories::{QuestRepo, UserQuestRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::user_quests::step_message;
use crate::state::AppState;

/// What a sign-in did to one `sign_in` quest.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdate {
    pub quest_id: DbId,
    pub quest_name: String,
    pub progress: i32,
    pub streak: i32,
    pub status: QuestStatus,
    /// Whether this sign-in credited the quest's reward (auto-claim quests).
    pub reward_granted: bool,
    pub message: String,
}

/// Count a sign-in for `user_id` toward every `sign_in` quest.
pub async fn track_sign_in(state: &AppState, user_id: DbId) -> Vec<ProgressUpdate> {
    let quests = match QuestRepo::list_by_trigger(&state.pool, QuestTrigger::SignIn).await {
        Ok(quests) => quests,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Could not load sign-in quests");
            return Vec::new();
        }
    };

    let mut updates = Vec::with_capacity(quests.len());
    for quest in &quests {
        match track_quest(state, user_id, quest).await {
            Ok(Some(update)) => updates.push(update),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(user_id, quest_id = quest.id, error = %e, "Sign-in quest tracking failed");
            }
        }
    }
    updates
}

async fn track_quest(
    state: &AppState,
    user_id: DbId,
    quest: &Quest,
) -> AppResult<Option<ProgressUpdate>> {
    let rules = quest.rules();

    let active = match UserQuestRepo::find_active(&state.pool, user_id, quest.id).await? {
        Some(active) => active,
        None => {
            let total = UserQuestRepo::count_for(&state.pool, user_id, quest.id).await?;
            if check_assignable(&rules, false, total).is_err() {
                let Some(latest) =
                    UserQuestRepo::find_latest(&state.pool, user_id, quest.id).await?
                else {
                    return Ok(None);
                };
                let status = latest.status()?;
                return Ok(Some(skipped(quest, &latest, status, MSG_DUPLICATION_LIMIT)));
            }
            let assigned = UserQuestRepo::assign(&state.pool, user_id, quest.id).await?;
            tracing::info!(user_id, quest_id = quest.id, "Sign-in quest auto-assigned");
            assigned
        }
    };

    let status = active.status()?;
    if status == QuestStatus::Completed {
        return Ok(Some(skipped(quest, &active, status, MSG_AWAITING_CLAIM)));
    }

    let step = advance(&rules, status, active.progress)?;
    let Some(applied) = UserQuestRepo::apply_step(
        &state.pool,
        active.id,
        status,
        active.progress,
        &step,
        quest.grant()?,
    )
    .await?
    else {
        // A concurrent login stepped it first; that request reports it.
        return Ok(None);
    };

    tracing::debug!(
        user_id,
        quest_id = quest.id,
        progress = applied.progress,
        status = %step.status,
        "Sign-in quest progressed"
    );

    Ok(Some(ProgressUpdate {
        quest_id: quest.id,
        quest_name: quest.name.clone(),
        progress: applied.progress,
        streak: quest.streak,
        status: step.status,
        reward_granted: step.grants_reward,
        message: step_message(&step).to_string(),
    }))
}

fn skipped(
    quest: &Quest,
    user_quest: &UserQuest,
    status: QuestStatus,
    message: &str,
) -> ProgressUpdate {
    ProgressUpdate {
        quest_id: quest.id,
        quest_name: quest.name.clone(),
        progress: user_quest.progress,
        streak: quest.streak,
        status,
        reward_granted: false,
        message: message.to_string(),
    }
}
