//! Configuration for the Parley HTTP API server.

use parley_core::constants::MAX_BODY_SIZE;
use parley_core::ParleyConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Socket address to bind to.
    pub bind_addr: SocketAddr,

    /// API base path (e.g., "/api").
    pub api_base_path: String,

    /// Enable CORS.
    pub enable_cors: bool,

    /// Allowed CORS origins.
    pub cors_allowed_origins: Vec<String>,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Enable request logging.
    pub enable_request_logging: bool,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Feature flags.
    pub features: ApiFeatures,
}

/// API feature flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFeatures {
    /// Enable chat API.
    pub enable_chat: bool,

    /// Enable media API.
    pub enable_media: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".parse().unwrap(),
            api_base_path: "/api".to_string(),
            enable_cors: true,
            cors_allowed_origins: vec!["http://localhost:5000".to_string()],
            request_timeout_seconds: 30,
            enable_request_logging: true,
            max_body_size: MAX_BODY_SIZE,
            features: ApiFeatures::default(),
        }
    }
}

impl Default for ApiFeatures {
    fn default() -> Self {
        Self {
            enable_chat: true,
            enable_media: true,
        }
    }
}

impl ApiConfig {
    /// Create API configuration from core Parley configuration.
    pub fn from_core_config(core_config: &ParleyConfig) -> Self {
        let mut config = Self::default();

        config.bind_addr = format!("{}:{}", core_config.http.host, core_config.http.port)
            .parse()
            .unwrap_or_else(|_| "127.0.0.1:5000".parse().unwrap());

        config.api_base_path = core_config.http.api_base_path.clone();
        config.enable_cors = core_config.http.enable_cors;
        config.request_timeout_seconds = core_config.http.request_timeout;
        config.enable_request_logging = core_config.http.enable_request_logging;

        config
    }
}
