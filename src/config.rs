//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub widget: WidgetSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dev server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// `wasm-pack build --target web` output served under `/widget`
    #[serde(default = "default_widget_dir")]
    pub widget_dir: String,

    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_widget_dir() -> String {
    "sasha-widget/pkg".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            widget_dir: default_widget_dir(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Attributes written onto the demo page's `#sasha-widget` anchor
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetSettings {
    #[serde(default = "default_brand")]
    pub brand: String,

    #[serde(default = "default_mode")]
    pub mode: String,

    /// Backend base URL for `data-api`; empty leaves the attribute off
    #[serde(default)]
    pub api_base: String,

    /// Sets `window.SASHA_WIDGET_DEBUG` on the demo page
    #[serde(default)]
    pub debug: bool,
}

fn default_brand() -> String {
    sasha_widget::config::DEFAULT_BRAND.to_string()
}

fn default_mode() -> String {
    sasha_widget::config::DEFAULT_MODE.to_string()
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            mode: default_mode(),
            api_base: String::new(),
            debug: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            Some(PathBuf::from("./sasha.toml")),
            dirs::config_dir().map(|p| p.join("sasha").join("config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(host) = std::env::var("SASHA_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SASHA_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(dir) = std::env::var("SASHA_WIDGET_DIR") {
            self.server.widget_dir = dir;
        }

        // Widget overrides
        if let Ok(brand) = std::env::var("SASHA_BRAND") {
            self.widget.brand = brand;
        }
        if let Ok(mode) = std::env::var("SASHA_MODE") {
            self.widget.mode = mode;
        }
        if let Ok(api) = std::env::var("SASHA_API") {
            self.widget.api_base = api;
        }
        if let Ok(debug) = std::env::var("SASHA_WIDGET_DEBUG") {
            self.widget.debug = matches!(debug.as_str(), "1" | "true" | "yes");
        }

        // Logging overrides
        if let Ok(level) = std::env::var("SASHA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SASHA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Sasha dev host configuration
#
# Environment variables override these settings:
# - SASHA_HOST, SASHA_PORT, SASHA_WIDGET_DIR
# - SASHA_BRAND, SASHA_MODE, SASHA_API, SASHA_WIDGET_DEBUG
# - SASHA_LOG_LEVEL, SASHA_LOG_FORMAT

[server]
host = "127.0.0.1"
port = 8090

# Output of `wasm-pack build sasha-widget --target web`
widget_dir = "sasha-widget/pkg"

# Empty list allows any origin
cors_origins = []

[widget]
brand = "Sasha"
mode = "customer"

# Point at this server to exercise the probe, e.g. "http://127.0.0.1:8090",
# or at "http://127.0.0.1:8090/simulate/503" to see a failing backend
api_base = ""

debug = false

[logging]
# trace, debug, info, warn, error
level = "info"

# pretty or json
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.addr(), "127.0.0.1:8090");
        assert_eq!(config.widget.brand, "Sasha");
        assert_eq!(config.widget.mode, "customer");
        assert!(config.widget.api_base.is_empty());
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.server.widget_dir, "sasha-widget/pkg");
        assert!(!config.widget.debug);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[widget]\nbrand = \"Acme\"\napi_base = \"http://localhost:9000\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.widget.brand, "Acme");
        assert_eq!(config.widget.mode, "customer");
        assert_eq!(config.widget.api_base, "http://localhost:9000");
        assert_eq!(config.server.port, 8090);
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/sasha.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a number\"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }
}
