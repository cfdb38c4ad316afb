use crate::constants::{DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT};
use crate::Error;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for Parley.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParleyConfig {
    /// HTTP server configuration.
    pub http: HttpConfig,

    /// Chat file storage configuration.
    pub storage: StorageConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Host to bind to.
    pub host: String,

    /// Port to bind to.
    pub port: u16,

    /// API base path.
    pub api_base_path: String,

    /// Enable CORS.
    pub enable_cors: bool,

    /// Request timeout in seconds.
    pub request_timeout: u64,

    /// Enable request logging.
    pub enable_request_logging: bool,
}

/// Chat file storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the per-chat JSON documents.
    pub data_dir: PathBuf,

    /// Optional template used to seed missing chat files.
    pub template_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    pub level: String,

    /// Also mirror logs to a journal file.
    pub log_to_file: bool,

    /// Journal file path; defaults next to the data directory.
    pub journal_path: Option<PathBuf>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            api_base_path: "/api".to_string(),
            enable_cors: true,
            request_timeout: 30,
            enable_request_logging: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            template_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            journal_path: None,
        }
    }
}

impl ParleyConfig {
    /// Load configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = default_config_path();
        if path.is_file() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Write configuration to a TOML file, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Effective data directory: `PARLEY_DATA_DIR` overrides the configured
    /// path.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Ok(path) = std::env::var("PARLEY_DATA_DIR") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        self.storage.data_dir.clone()
    }
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parley")
        .join("config.toml")
}

/// Default chat data directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parley")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ParleyConfig::default();
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
        assert_eq!(config.http.api_base_path, "/api");
        assert!(config.storage.data_dir.ends_with("parley"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = ParleyConfig::default();
        config.http.port = 6060;
        config.storage.template_path = Some(PathBuf::from("/tmp/starter.json"));

        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: ParleyConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.http.port, 6060);
        assert_eq!(
            parsed.storage.template_path.as_deref(),
            Some(std::path::Path::new("/tmp/starter.json"))
        );
    }
}
