mod auth;
mod config;
mod errors;
mod llm_client;
mod logging;
mod post;
mod render;
mod review;
mod revision;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::logging::LoggingConfig;
use crate::revision::RevisionPolicy;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    let logging = match &config.log_config {
        Some(path) => LoggingConfig::load(path)?,
        None => LoggingConfig::from_level(&config.rust_log),
    };
    logging::init(&logging)?;

    info!("Starting Blog Agent v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration: {config:?}");

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        Some(config.openai_base_url.clone()),
        config.llm_timeout,
    )?;
    info!(
        "LLM client initialized (models: {}, {})",
        llm_client::MODEL,
        llm_client::MINI_MODEL
    );

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        secret: Arc::new(config.secret.clone()),
        revision: RevisionPolicy::new(config.max_revision_attempts),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
