//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// GET /users              -> list_users
/// GET /users/me           -> me (requires auth)
/// GET /users/{id}         -> get_user
/// GET /users-with-quests  -> users_with_quests
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/me", get(users::me))
        .route("/users/{id}", get(users::get_user))
        .route("/users-with-quests", get(users::users_with_quests))
}
