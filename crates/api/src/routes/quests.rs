//! Route definitions for the `/quests` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::quests;
use crate::state::AppState;

/// ```text
/// GET  /quests       -> list_quests
/// POST /quests       -> create_quest (requires auth)
/// GET  /quests/{id}  -> get_quest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/quests",
            get(quests::list_quests).post(quests::create_quest),
        )
        .route("/quests/{id}", get(quests::get_quest))
}
