//! Handlers for the `/users` resource and the users-with-quests overview.

use axum::extract::{Path, State};
use axum::Json;
use questforge_core::error::CoreError;
use questforge_core::types::DbId;
use questforge_db::models::user::UserResponse;
use questforge_db::models::user_quest::UserQuestDetail;
use questforge_db::repositories::{UserQuestRepo, UserRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// A user together with all of their quest assignments.
#[derive(Debug, Serialize)]
pub struct UserWithQuests {
    #[serde(flatten)]
    pub user: UserResponse,
    pub quests: Vec<UserQuestDetail>,
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user.into()))
}

/// GET /users/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(Json(user.into()))
}

/// GET /users-with-quests
///
/// Every user with their assignments; users without any get an empty list.
pub async fn users_with_quests(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserWithQuests>>> {
    let users = UserRepo::list(&state.pool).await?;
    let details = UserQuestRepo::list_all_details(&state.pool).await?;

    let mut out: Vec<UserWithQuests> = users
        .into_iter()
        .map(|u| UserWithQuests {
            user: u.into(),
            quests: Vec::new(),
        })
        .collect();

    // Both lists are ordered by user id.
    let mut idx = 0;
    for detail in details {
        while idx < out.len() && out[idx].user.user_id < detail.user_id {
            idx += 1;
        }
        if let Some(entry) = out.get_mut(idx).filter(|e| e.user.user_id == detail.user_id) {
            entry.quests.push(detail);
        }
    }

    Ok(Json(out))
}
