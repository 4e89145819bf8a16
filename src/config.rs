//! Configuration module for the account service.

use serde::Deserialize;
use std::path::Path;

use crate::presence::DEFAULT_ONLINE_WINDOW_SECS;
use crate::{Result, ServiceError};

/// Environment variable overriding `web.jwt_secret`.
pub const JWT_SECRET_ENV: &str = "AUTH_SERVICE_JWT_SECRET";

/// Upper bound for `web.jwt_access_token_expiry_secs` (1 day).
pub const MAX_ACCESS_TOKEN_EXPIRY_SECS: u64 = 86_400;

/// Upper bound for `web.jwt_refresh_token_expiry_days` (1 year).
pub const MAX_REFRESH_TOKEN_EXPIRY_DAYS: u64 = 365;

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/auth_service.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/auth_service.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// JWT secret key (required).
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token expiry in seconds.
    #[serde(default = "default_jwt_access_expiry")]
    pub jwt_access_token_expiry_secs: u64,
    /// Refresh token expiry in days.
    #[serde(default = "default_jwt_refresh_expiry")]
    pub jwt_refresh_token_expiry_days: u64,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

fn default_jwt_access_expiry() -> u64 {
    900 // 15 minutes
}

fn default_jwt_refresh_expiry() -> u64 {
    7
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            jwt_secret: String::new(),
            jwt_access_token_expiry_secs: default_jwt_access_expiry(),
            jwt_refresh_token_expiry_days: default_jwt_refresh_expiry(),
        }
    }
}

/// Presence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    /// How long after the last authenticated request a user still counts as online.
    #[serde(default = "default_online_window")]
    pub online_window_secs: u64,
}

fn default_online_window() -> u64 {
    DEFAULT_ONLINE_WINDOW_SECS
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            online_window_secs: default_online_window(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Presence configuration.
    #[serde(default)]
    pub presence: PresenceConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ServiceError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ServiceError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `AUTH_SERVICE_JWT_SECRET`: Override the JWT secret key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var(JWT_SECRET_ENV) {
            if !jwt_secret.is_empty() {
                self.web.jwt_secret = jwt_secret;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(ServiceError::Config(format!(
                "jwt_secret is not set. Set it in config.toml or via {JWT_SECRET_ENV}."
            )));
        }
        let access = self.web.jwt_access_token_expiry_secs;
        if access == 0 || access > MAX_ACCESS_TOKEN_EXPIRY_SECS {
            return Err(ServiceError::Config(format!(
                "web.jwt_access_token_expiry_secs must be between 1 and {MAX_ACCESS_TOKEN_EXPIRY_SECS}"
            )));
        }
        let refresh = self.web.jwt_refresh_token_expiry_days;
        if refresh == 0 || refresh > MAX_REFRESH_TOKEN_EXPIRY_DAYS {
            return Err(ServiceError::Config(format!(
                "web.jwt_refresh_token_expiry_days must be between 1 and {MAX_REFRESH_TOKEN_EXPIRY_DAYS}"
            )));
        }
        if self.presence.online_window_secs == 0 {
            return Err(ServiceError::Config(
                "presence.online_window_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
