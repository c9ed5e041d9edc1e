//! `questforge-api` binary: loads `.env`, migrates SQLite and serves until
//! SIGINT or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use questforge_api::config::ServerConfig;
use questforge_api::router::build_app_router;
use questforge_api::state::AppState;

const DEFAULT_LOG_FILTER: &str = "questforge_api=debug,questforge_db=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    // Startup is all-or-nothing: any failure below aborts the process.
    let pool = questforge_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to open SQLite pool");
    questforge_db::health_check(&pool)
        .await
        .expect("SQLite did not answer SELECT 1");
    questforge_db::run_migrations(&pool)
        .await
        .expect("Failed to apply migrations");
    tracing::info!(url = %config.database_url, "Database ready");

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST is not an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "QuestForge API listening");

    // `App` wraps the router, so it needs the request type spelled out.
    axum::serve(
        listener,
        ServiceExt::<axum::extract::Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");

    pool.close().await;
    tracing::info!("Shutdown complete, database pool closed");
}

/// `RUST_LOG` wins over [`DEFAULT_LOG_FILTER`].
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolves on Ctrl-C, or on SIGTERM where the platform has it.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl-C");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Draining in-flight requests");
}
