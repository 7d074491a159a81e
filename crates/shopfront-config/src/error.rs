// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors raised while locating, reading and checking a config file.

use std::path::PathBuf;

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file was read but is not a valid document for its format, or it
    /// names a section the server does not know.
    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// A value is well formed but unusable, e.g. an empty `auth.secret`.
    /// `field` is the dotted key path.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `SHOPFRONT_*` override could not be applied.
    #[error("Invalid environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Only `.yaml`, `.yml` and `.toml` files are understood.
    #[error("Unsupported config format: {format}")]
    UnsupportedFormat { format: String },

    /// Deserialization failure for in-memory content with no path.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ConfigError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Dotted key path of a [`Validation`](Self::Validation) failure.
    pub fn field(&self) -> Option<&str> {
        if let ConfigError::Validation { field, .. } = self {
            Some(field)
        } else {
            None
        }
    }
}
