//! Liveness endpoint reporting the service version and database reachability.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`. `status` is `degraded` when SQLite is unreachable.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthResponse {
    fn new(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

/// GET /health
///
/// Always 200; a failed `SELECT 1` only flips `db_healthy`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    if let Err(e) = questforge_db::health_check(&state.pool).await {
        tracing::warn!(error = %e, "Database unreachable during health check");
        return Json(HealthResponse::new(false));
    }
    Json(HealthResponse::new(true))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
