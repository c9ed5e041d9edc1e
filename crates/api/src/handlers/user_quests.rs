//! Handlers for quest assignments: assign, progress, claim, and listing.
//!
//! Mutations act on behalf of the token's user. A `user_id` in the body is
//! accepted for compatibility but must match the token subject.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use questforge_core::error::CoreError;
use questforge_core::progress::{
    advance, check_assignable, check_claimable, QuestStatus, Step, MSG_ALREADY_ASSIGNED,
    MSG_ALREADY_CLAIMED, MSG_NOT_ASSIGNED,
};
use questforge_core::types::DbId;
use questforge_db::models::quest::Quest;
use questforge_db::models::reward::Reward;
use questforge_db::models::user::{User, UserResponse};
use questforge_db::models::user_quest::{UserQuest, UserQuestDetail};
use questforge_db::repositories::{QuestRepo, RewardRepo, UserQuestRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const MSG_RETRY: &str = "Quest state changed concurrently, please retry";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `/assign-quest`, `/complete-quest` and `/claim-reward`.
#[derive(Debug, Deserialize)]
pub struct QuestActionRequest {
    /// Optional; defaults to the authenticated user.
    #[serde(default)]
    pub user_id: Option<DbId>,
    pub quest_id: DbId,
}

/// Response for `POST /complete-quest`.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub message: &'static str,
    pub user_quest: UserQuestDetail,
    /// Present when the step completed an auto-claim quest.
    pub reward_granted: Option<Reward>,
}

/// Response for `POST /claim-reward`.
#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub message: &'static str,
    pub reward: Reward,
    /// The user with updated balances.
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /assign-quest
pub async fn assign_quest(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<QuestActionRequest>,
) -> AppResult<(StatusCode, Json<UserQuestDetail>)> {
    let user = acting_user(&state, &auth, input.user_id).await?;
    let quest = load_quest(&state, input.quest_id).await?;

    let active = UserQuestRepo::find_active(&state.pool, user.id, quest.id).await?;
    let total = UserQuestRepo::count_for(&state.pool, user.id, quest.id).await?;
    check_assignable(&quest.rules(), active.is_some(), total)?;

    let assigned = match UserQuestRepo::assign(&state.pool, user.id, quest.id).await {
        Ok(assigned) => assigned,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(AppError::Core(CoreError::Conflict(
                MSG_ALREADY_ASSIGNED.into(),
            )));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        user_id = user.id,
        quest_id = quest.id,
        user_quest_id = assigned.id,
        "Quest assigned"
    );

    let detail = load_detail(&state, assigned.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// POST /complete-quest
///
/// Record one progress step on the user's active assignment.
pub async fn complete_quest(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<QuestActionRequest>,
) -> AppResult<Json<ProgressResponse>> {
    let user = acting_user(&state, &auth, input.user_id).await?;
    let quest = load_quest(&state, input.quest_id).await?;

    let active = UserQuestRepo::find_active(&state.pool, user.id, quest.id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Missing(MSG_NOT_ASSIGNED.into())))?;

    let status = active.status()?;
    let step = advance(&quest.rules(), status, active.progress)?;

    let applied = UserQuestRepo::apply_step(
        &state.pool,
        active.id,
        status,
        active.progress,
        &step,
        quest.grant()?,
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::Conflict(MSG_RETRY.into())))?;

    tracing::info!(
        user_id = user.id,
        quest_id = quest.id,
        progress = applied.progress,
        status = %step.status,
        "Quest progressed"
    );

    let reward_granted = if step.grants_reward {
        Some(load_reward(&state, quest.reward_id).await?)
    } else {
        None
    };

    Ok(Json(ProgressResponse {
        message: step_message(&step),
        user_quest: load_detail(&state, applied.id).await?,
        reward_granted,
    }))
}

/// POST /claim-reward
///
/// Claim the reward of a completed assignment, crediting the user's balance.
pub async fn claim_reward(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<QuestActionRequest>,
) -> AppResult<Json<ClaimResponse>> {
    let user = acting_user(&state, &auth, input.user_id).await?;
    let quest = load_quest(&state, input.quest_id).await?;

    let target = claim_target(&state, user.id, quest.id).await?;
    check_claimable(target.status()?)?;

    let claimed = UserQuestRepo::claim(&state.pool, target.id, quest.grant()?)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict(MSG_ALREADY_CLAIMED.into())))?;

    tracing::info!(
        user_id = user.id,
        quest_id = quest.id,
        user_quest_id = claimed.id,
        "Reward claimed"
    );

    let reward = load_reward(&state, quest.reward_id).await?;
    let user = UserRepo::find_by_id(&state.pool, user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }))?;

    Ok(Json(ClaimResponse {
        message: "Reward claimed successfully",
        reward,
        user: user.into(),
    }))
}

/// GET /user-quests/{user_id}
///
/// Every assignment of the user, oldest first.
pub async fn list_user_quests(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<Vec<UserQuestDetail>>> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    let details = UserQuestRepo::list_details_for_user(&state.pool, user_id).await?;
    Ok(Json(details))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Human-readable outcome of a progress step.
pub(crate) fn step_message(step: &Step) -> &'static str {
    match step.status {
        QuestStatus::InProgress => "Quest progress updated",
        QuestStatus::Completed => "Quest completed. Claim your reward.",
        QuestStatus::Claimed => "Quest completed and reward claimed",
    }
}

/// Resolve the user a quest mutation acts on.
///
/// Rejects a body `user_id` that differs from the token subject, and banned
/// accounts.
async fn acting_user(
    state: &AppState,
    auth: &AuthUser,
    requested: Option<DbId>,
) -> AppResult<User> {
    if let Some(id) = requested {
        if id != auth.user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "Cannot act on behalf of another user".into(),
            )));
        }
    }

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if user.status()?.is_banned() {
        return Err(AppError::Core(CoreError::Forbidden("User is banned".into())));
    }
    Ok(user)
}

async fn load_quest(state: &AppState, id: DbId) -> AppResult<Quest> {
    QuestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quest", id }))
}

async fn load_reward(state: &AppState, id: DbId) -> AppResult<Reward> {
    RewardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Reward", id }))
}

async fn load_detail(state: &AppState, id: DbId) -> AppResult<UserQuestDetail> {
    UserQuestRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "UserQuest",
            id,
        }))
}

/// The assignment a claim applies to: the active one, or else the most
/// recent (already claimed) one so the caller gets a precise conflict.
async fn claim_target(state: &AppState, user_id: DbId, quest_id: DbId) -> AppResult<UserQuest> {
    if let Some(active) = UserQuestRepo::find_active(&state.pool, user_id, quest_id).await? {
        return Ok(active);
    }
    UserQuestRepo::find_latest(&state.pool, user_id, quest_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Missing(MSG_NOT_ASSIGNED.into())))
}
