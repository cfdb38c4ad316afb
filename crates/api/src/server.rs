//! HTTP server implementation for the Parley API.

use crate::{config::ApiConfig, router::build_router, session, ApiError};
use axum::Router;
use parley_core::ChatStore;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

/// HTTP server for the Parley API.
pub struct ApiServer {
    config: ApiConfig,
    router: Router,
}

impl ApiServer {
    /// Create a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        let router = build_router(&config);

        Self { config, router }
    }

    /// Run the server until shutdown signal.
    pub async fn run(self, store: ChatStore) -> Result<(), ApiError> {
        let addr = self.config.bind_addr;

        info!("Starting Parley API server");
        info!("API base path: {}", self.config.api_base_path);
        info!("CORS enabled: {}", self.config.enable_cors);
        info!("Chat store root: {}", store.root().display());

        session::init_session(store).await;

        let router = self.build_router_with_middleware();
        let shutdown = shutdown_signal();

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            ApiError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                format!("Failed to bind to {}: {}", addr, e),
            ))
        })?;

        info!("Server listening on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Build router with all middleware layers.
    fn build_router_with_middleware(&self) -> Router {
        let mut router = self.router.clone();

        // Add request timeout
        if self.config.request_timeout_seconds > 0 {
            router = router.layer(tower_http::timeout::TimeoutLayer::new(
                std::time::Duration::from_secs(self.config.request_timeout_seconds),
            ));
        }

        // Add request logging
        if self.config.enable_request_logging {
            router = router.layer(tower_http::trace::TraceLayer::new_for_http());
        }

        // Add body size limit
        router = router.layer(tower_http::limit::RequestBodyLimitLayer::new(
            self.config.max_body_size,
        ));

        router
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Get the API configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

/// Create a shutdown signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C signal, shutting down...");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
        info!("Received SIGTERM signal, shutting down...");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Utility function to start server from configuration.
pub async fn start_server(config: ApiConfig, store: ChatStore) -> Result<(), ApiError> {
    let server = ApiServer::new(config);
    server.run(store).await
}
