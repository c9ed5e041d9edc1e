//! Route definitions for quest assignments.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user_quests;
use crate::state::AppState;

/// ```text
/// POST /assign-quest          -> assign_quest (requires auth)
/// POST /complete-quest        -> complete_quest (requires auth)
/// POST /claim-reward          -> claim_reward (requires auth)
/// GET  /user-quests/{user_id} -> list_user_quests
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assign-quest", post(user_quests::assign_quest))
        .route("/complete-quest", post(user_quests::complete_quest))
        .route("/claim-reward", post(user_quests::claim_reward))
        .route("/user-quests/{user_id}", get(user_quests::list_user_quests))
}
