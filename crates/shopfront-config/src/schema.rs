// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema for the Shopfront backend.
//!
//! # Schema Structure
//!
//! ```text
//! ShopfrontConfig
//! ├── server: ServerConfig
//! ├── database: StoreConfig
//! ├── auth: JwtConfig
//! └── logging: LoggingConfig
//! ```
//!
//! The `database` and `auth` sections deserialize straight into the types the
//! store and the API consume, so a file key maps one to one onto the field
//! that uses it.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shopfront_api::auth::JwtConfig;
use shopfront_api::{ApiConfig, CorsConfig};
use shopfront_store::StoreConfig;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default API port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default request and shutdown timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum request body size (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShopfrontConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: StoreConfig,

    /// Token signing settings.
    #[serde(default)]
    pub auth: JwtConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShopfrontConfig {
    /// Validates every section, reporting the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        validate_database(&self.database)?;
        validate_auth(&self.auth)?;
        Ok(())
    }

    /// Builds the API server configuration.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new()
            .with_host(self.server.host)
            .with_port(self.server.port)
            .with_cors(self.server.cors.clone())
            .with_jwt(self.auth.clone())
            .with_request_timeout(Duration::from_secs(self.server.request_timeout_secs))
            .with_shutdown_timeout(Duration::from_secs(self.server.shutdown_timeout_secs))
            .with_max_body_size(self.server.max_body_size)
    }

    /// Returns the database configuration.
    pub fn store_config(&self) -> StoreConfig {
        self.database.clone()
    }
}

fn validate_database(database: &StoreConfig) -> ConfigResult<()> {
    if database.url.trim().is_empty() {
        return Err(ConfigError::validation(
            "database.url",
            "database url cannot be empty",
        ));
    }
    if database.max_connections == 0 {
        return Err(ConfigError::validation(
            "database.max_connections",
            "must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_auth(auth: &JwtConfig) -> ConfigResult<()> {
    if auth.secret.trim().is_empty() {
        return Err(ConfigError::validation(
            "auth.secret",
            "JWT secret is required (set SHOPFRONT_JWT_SECRET)",
        ));
    }
    if auth.issuer.trim().is_empty() {
        return Err(ConfigError::validation("auth.issuer", "cannot be empty"));
    }
    auth.validate()
        .map_err(|e| ConfigError::validation("auth", e.to_string()))
}

// =============================================================================
// ServerConfig
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    pub host: IpAddr,

    /// Bind port.
    pub port: u16,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Grace period for in-flight requests at shutdown, in seconds.
    pub shutdown_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// CORS policy.
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            shutdown_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validates the server settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "must be greater than 0",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout_secs",
                "must be greater than 0",
            ));
        }
        if self.max_body_size == 0 {
            return Err(ConfigError::validation(
                "server.max_body_size",
                "must be greater than 0",
            ));
        }
        if self.cors.allowed_origins.is_empty() {
            return Err(ConfigError::validation(
                "server.cors.allowed_origins",
                "list at least one origin or \"*\"",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// LoggingConfig
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Filter directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::validation(
                "logging.level",
                format!("unknown level '{}'", other),
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Single-line compact output.
    Compact,
    /// JSON objects, one per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::validation(
                "logging.format",
                format!("unknown format '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ShopfrontConfig {
        let mut config = ShopfrontConfig::default();
        config.auth.secret = "a-secret-long-enough-for-hs256-signing".to_string();
        config
    }

    #[test]
    fn test_defaults_need_a_secret() {
        let err = ShopfrontConfig::default().validate().unwrap_err();
        assert_eq!(err.field(), Some("auth.secret"));
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_rejects_port_zero() {
        let mut config = valid();
        config.server.port = 0;
        assert_eq!(config.validate().unwrap_err().field(), Some("server.port"));
    }

    #[test]
    fn test_rejects_bad_database() {
        let mut config = valid();
        config.database.url = "  ".to_string();
        assert_eq!(config.validate().unwrap_err().field(), Some("database.url"));

        let mut config = valid();
        config.database.max_connections = 0;
        assert_eq!(
            config.validate().unwrap_err().field(),
            Some("database.max_connections")
        );
    }

    #[test]
    fn test_rejects_non_positive_expiry() {
        let mut config = valid();
        config.auth.expiration_secs = 0;
        assert_eq!(config.validate().unwrap_err().field(), Some("auth"));
    }

    #[test]
    fn test_api_config_conversion() {
        let mut config = valid();
        config.server.port = 9090;
        config.server.request_timeout_secs = 5;
        config.server.shutdown_timeout_secs = 7;
        config.server.max_body_size = 2048;

        let api = config.api_config();
        assert_eq!(api.port, 9090);
        assert_eq!(api.request_timeout, Duration::from_secs(5));
        assert_eq!(api.shutdown_timeout, Duration::from_secs(7));
        assert_eq!(api.max_body_size, 2048);
        assert_eq!(api.jwt.secret, config.auth.secret);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(LogLevel::default().to_string(), "info");
    }
}
