//! Yugen API server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use yugen_api::config::Config;
use yugen_api::error::AppError;
use yugen_api::routes;
use yugen_api::state::AppState;
use yugen_api::telemetry;
use yugen_core::clock::SystemClock;
use yugen_store::{MIGRATOR, PgStore};

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let provider = telemetry::init(&config)?;

    info!("Starting Yugen API server");

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    MIGRATOR.run(&pool).await?;

    let app_state = AppState::from_store(Arc::new(PgStore::new(pool)), Arc::new(SystemClock));

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(config.cors_layer()?)
        .with_state(app_state);

    let addr = config.socket_addr()?;
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry::shutdown(provider);
    Ok(())
}
