//! Route definitions for account and session endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /signup    -> signup (201, returns a token)
/// POST /register  -> register (201)
/// POST /login     -> login (JSON body, reports sign-in quest progress)
/// POST /token     -> token (form body)
/// POST /logout    -> logout (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/token", post(auth::token))
        .route("/logout", post(auth::logout))
}
