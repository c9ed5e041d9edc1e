pub mod auth;
pub mod health;
pub mod quests;
pub mod rewards;
pub mod user_quests;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree (mounted at the root, next to `/health`).
///
/// Route hierarchy:
///
/// ```text
/// /signup /register /login /token       public
/// /logout                               requires auth
///
/// /users                                list
/// /users/me                             current user (requires auth)
/// /users/{id}                           get
/// /users-with-quests                    users with their assignments
///
/// /quests                               list, create (create requires auth)
/// /quests/{id}                          get
///
/// /rewards                              list, create (create requires auth)
/// /rewards/{id}                         get
///
/// /assign-quest                         assign (requires auth)
/// /complete-quest                       one progress step (requires auth)
/// /claim-reward                         claim (requires auth)
/// /user-quests/{user_id}                a user's assignments
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(quests::router())
        .merge(rewards::router())
        .merge(user_quests::router())
}
