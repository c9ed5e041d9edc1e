//! Route definitions for the `/rewards` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::rewards;
use crate::state::AppState;

/// ```text
/// GET  /rewards       -> list_rewards
/// POST /rewards       -> create_reward (requires auth)
/// GET  /rewards/{id}  -> get_reward
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/rewards",
            get(rewards::list_rewards).post(rewards::create_reward),
        )
        .route("/rewards/{id}", get(rewards::get_reward))
}
