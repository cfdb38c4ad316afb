//! Parley web server entry point.
//!
//! Starts an Axum HTTP server that serves the static chat UI and mounts the
//! Parley API under the configured base path.

use axum::{routing::get, Router};
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::fmt;

use parley_api::config::ApiConfig;
use parley_api::router::build_router;
use parley_api::session::init_session;
use parley_core::{ChatStore, ParleyConfig};
use parley_web::assets::static_files_service;

/// Main entry point.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    fmt().with_max_level(Level::INFO).with_target(false).init();

    info!("Starting Parley web server...");

    // Load configuration
    let config = ParleyConfig::load()?;
    let api_config = ApiConfig::from_core_config(&config);

    // Initialize the chat store and the single active session
    let data_dir = config.resolve_data_dir();
    let mut store = ChatStore::new(&data_dir);
    if let Some(template) = &config.storage.template_path {
        store = store.with_template(template);
    }
    info!("Chat store root: {}", data_dir.display());
    init_session(store).await;

    // Build API router
    let api_router = build_router(&api_config);

    // Build static file service
    let static_service = static_files_service();

    // Combine routers: API, health, static files (in order of precedence)
    let app = Router::new()
        .nest(&api_config.api_base_path, api_router)
        .route("/health", get(|| async { "OK" }))
        .merge(static_service);

    // Start server
    let addr: SocketAddr = api_config.bind_addr;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
