//! The QuestForge HTTP service: every route plus its middleware.
//!
//! `main.rs` serves [`build_app_router`] and the integration tests drive it
//! with `oneshot`, so both see one layer stack.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Routes wrapped in trailing-slash normalization.
///
/// `Router::layer` runs after route matching, too late to rewrite the path.
pub type App = NormalizePath<Router>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assemble the health, account, catalog and quest routes.
///
/// A request passes the layers in this order (outermost first):
///
/// | Layer | Effect |
/// |-------|--------|
/// | `NormalizePath` | `/quests/` routes like `/quests` |
/// | CORS | browser preflight for the configured origins |
/// | `SetRequestId` | assigns `x-request-id` when the caller sent none |
/// | `Trace` | one INFO span per request |
/// | `PropagateRequestId` | echoes `x-request-id` on the response |
/// | `Timeout` | 408 after `request_timeout_secs` |
/// | `CatchPanic` | a panicking handler becomes a 500 |
pub fn build_app_router(state: AppState, config: &ServerConfig) -> App {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = Router::new()
        .merge(routes::health::router())
        .merge(routes::api_routes())
        // Last `.layer` call is outermost.
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// CORS for the browser client: GET/POST with JSON bodies and bearer tokens.
///
/// An unparsable entry in `CORS_ORIGINS` panics, so it surfaces at startup.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
