//! Server configuration loaded from environment variables.
//!
//! All configuration is loaded from environment variables with sensible
//! defaults for development. A `.env` file in the working directory is read
//! first if present.
//!
//! # Variables
//!
//! - `HOST`: bind host (default: `0.0.0.0`)
//! - `PORT`: bind port (default: 3000)
//! - `RUST_LOG`: log filter (default: `info`)
//! - `LOG_FORMAT`: `text` or `json` (default: `text`)
//! - `METRICS_PORT`: Prometheus listener port, 0 disables it (default: 9090)

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 3000)
    pub port: u16,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Log level filter (e.g., "info", "issuer_id=debug")
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Port for Prometheus metrics endpoint (default: 9090, 0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if any value fails to parse or the
    /// combination is invalid.
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 3000)?,
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: Self::parse_env("LOG_FORMAT", LogFormat::Text)?,
            metrics_port: Self::parse_env("METRICS_PORT", 9090)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency.
    fn validate(&self) -> AppResult<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::ConfigError("HOST must not be empty".to_string()));
        }

        if self.metrics_enabled() && self.metrics_port == self.port {
            return Err(AppError::ConfigError(format!(
                "METRICS_PORT ({}) must differ from PORT ({})",
                self.metrics_port, self.port
            )));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address.
    ///
    /// Returns `None` if metrics are disabled (port = 0).
    pub fn metrics_addr(&self) -> Option<std::net::SocketAddr> {
        if self.metrics_enabled() {
            Some(std::net::SocketAddr::from((
                [0, 0, 0, 0],
                self.metrics_port,
            )))
        } else {
            None
        }
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .parse()
                .map_err(|e| AppError::ConfigError(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_port: 9090,
        }
    }
}
