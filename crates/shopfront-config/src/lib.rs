// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # shopfront-config
//!
//! Configuration management for the Shopfront backend.
//!
//! - YAML, TOML and JSON files
//! - `${VAR}` and `${VAR:default}` placeholder expansion
//! - `SHOPFRONT_*` environment overrides
//! - Validation with the offending field named in the error
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//! database:
//!   url: sqlite://shopfront.db
//!   max_connections: 5
//! auth:
//!   secret: ${SHOPFRONT_JWT_SECRET}
//!   expiration_secs: 86400
//! logging:
//!   level: info
//!   format: json
//! ```

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, ConfigFormat, ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{LogFormat, LogLevel, LoggingConfig, ServerConfig, ShopfrontConfig};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
