//! Handlers for the `/quests` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use questforge_core::error::CoreError;
use questforge_core::quest::{validate_quest, QuestTrigger};
use questforge_core::types::DbId;
use questforge_db::models::quest::{CreateQuest, Quest};
use questforge_db::repositories::{QuestRepo, RewardRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /quests`.
#[derive(Debug, Deserialize)]
pub struct CreateQuestRequest {
    pub reward_id: DbId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub auto_claim: bool,
    #[serde(default = "one")]
    pub streak: i32,
    #[serde(default = "one")]
    pub duplication: i32,
    /// `manual` (default) or `sign_in`.
    #[serde(default)]
    pub trigger: Option<String>,
}

fn one() -> i32 {
    1
}

/// GET /quests
pub async fn list_quests(State(state): State<AppState>) -> AppResult<Json<Vec<Quest>>> {
    Ok(Json(QuestRepo::list(&state.pool).await?))
}

/// GET /quests/{id}
pub async fn get_quest(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Quest>> {
    let quest = QuestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quest", id }))?;
    Ok(Json(quest))
}

/// POST /quests
pub async fn create_quest(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateQuestRequest>,
) -> AppResult<(StatusCode, Json<Quest>)> {
    validate_quest(&input.name, input.streak, input.duplication)?;
    let trigger = match input.trigger.as_deref() {
        Some(raw) => raw.parse::<QuestTrigger>()?,
        None => QuestTrigger::default(),
    };

    RewardRepo::find_by_id(&state.pool, input.reward_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reward",
            id: input.reward_id,
        }))?;

    let dto = CreateQuest {
        reward_id: input.reward_id,
        name: input.name.trim().to_string(),
        description: input.description,
        auto_claim: input.auto_claim,
        streak: input.streak,
        duplication: input.duplication,
        trigger,
    };
    let quest = QuestRepo::create(&state.pool, &dto).await?;

    tracing::info!(
        quest_id = quest.id,
        reward_id = quest.reward_id,
        created_by = auth.user_id,
        "Quest created"
    );

    Ok((StatusCode::CREATED, Json(quest)))
}
