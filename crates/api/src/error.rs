//! Error type shared by every handler and its JSON rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use questforge_core::error::CoreError;
use serde_json::json;

const MSG_INTERNAL: &str = "An internal error occurred";

/// Status, machine-readable code and client-facing message.
type ErrorParts = (StatusCode, &'static str, String);

/// Anything a QuestForge handler can fail with.
///
/// Renders as `{"detail": ..., "code": ...}`; the web frontend shows
/// `detail` verbatim, so internal causes are logged and never sent.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Logged in full, reported as a generic 500.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Handler failed");
                internal()
            }
        };

        (status, axum::Json(json!({ "detail": detail, "code": code }))).into_response()
    }
}

fn core_parts(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Missing(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Domain invariant broken");
            internal()
        }
    }
}

/// Map SQLite failures onto client errors where the cause is the request.
///
/// | sqlx error | Status |
/// |------------|--------|
/// | `RowNotFound` | 404 |
/// | UNIQUE violation | 409 |
/// | FOREIGN KEY or CHECK violation | 400 |
/// | anything else | 500, message withheld |
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    let sqlx::Error::Database(db_err) = err else {
        if matches!(err, sqlx::Error::RowNotFound) {
            return (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".to_string());
        }
        tracing::error!(error = %err, "Database error");
        return internal();
    };

    if db_err.is_unique_violation() {
        (
            StatusCode::CONFLICT,
            "CONFLICT",
            "Duplicate value violates a unique constraint".to_string(),
        )
    } else if db_err.is_foreign_key_violation() {
        (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Referenced record does not exist".to_string(),
        )
    } else if db_err.is_check_violation() {
        tracing::warn!(error = %db_err, "CHECK constraint rejected a write");
        (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Value out of range".to_string(),
        )
    } else {
        tracing::error!(error = %db_err, "Database error");
        internal()
    }
}

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        MSG_INTERNAL.to_string(),
    )
}
