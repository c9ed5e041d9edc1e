//! Handlers for the `/rewards` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use questforge_core::error::CoreError;
use questforge_core::reward::{validate_reward, RewardItem};
use questforge_core::types::DbId;
use questforge_db::models::reward::{CreateReward, Reward};
use questforge_db::repositories::RewardRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /rewards`.
///
/// Accepts both the short field names and the `reward_`-prefixed ones the
/// browser form sends.
#[derive(Debug, Deserialize)]
pub struct CreateRewardRequest {
    #[serde(alias = "reward_name")]
    pub name: String,
    #[serde(alias = "reward_item")]
    pub item: String,
    #[serde(alias = "reward_qty")]
    pub qty: i64,
}

/// GET /rewards
pub async fn list_rewards(State(state): State<AppState>) -> AppResult<Json<Vec<Reward>>> {
    Ok(Json(RewardRepo::list(&state.pool).await?))
}

/// GET /rewards/{id}
pub async fn get_reward(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Reward>> {
    let reward = RewardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Reward", id }))?;
    Ok(Json(reward))
}

/// POST /rewards
pub async fn create_reward(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateRewardRequest>,
) -> AppResult<(StatusCode, Json<Reward>)> {
    let item: RewardItem = input.item.parse()?;
    validate_reward(&input.name, input.qty)?;

    let dto = CreateReward {
        name: input.name.trim().to_string(),
        item,
        qty: input.qty,
    };
    let reward = RewardRepo::create(&state.pool, &dto).await?;

    tracing::info!(reward_id = reward.id, created_by = auth.user_id, "Reward created");
    Ok((StatusCode::CREATED, Json(reward)))
}
