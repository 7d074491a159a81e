// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Failures of the `shopfront` command and how they end the process.

use thiserror::Error;

/// Result of a subcommand.
pub type BinResult<T> = Result<T, BinError>;

/// Everything a subcommand can fail with.
///
/// Each variant maps to its own process exit status so scripts driving the
/// admin commands can tell a bad config from a missing account.
#[derive(Debug, Error)]
pub enum BinError {
    /// Settings that load but cannot be used.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The config file could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] shopfront_config::ConfigError),

    /// Logging, state or listener setup failed.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// The server failed while running.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Socket or file failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database failure.
    #[error("Database error: {0}")]
    Store(#[from] shopfront_store::StoreError),

    /// Failure reported by the HTTP layer.
    #[error("API error: {0}")]
    Api(#[from] shopfront_api::ApiError),

    /// An admin command named a user or role that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Another error with a description of what was being attempted.
    #[error("{context}: {source}")]
    WithContext {
        /// What was being attempted.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Unusable settings.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Setup failure.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Failure while serving.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Missing user or role.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Wraps `self` under a description of what was being attempted.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Process exit status; context wrappers report their innermost cause.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::WithContext { source, .. } => source.exit_code(),
            Self::Configuration(_) | Self::Config(_) => 1,
            Self::Initialization(_) => 2,
            Self::Runtime(_) => 3,
            Self::Io(_) => 4,
            Self::Store(_) => 5,
            Self::Api(_) => 6,
            Self::NotFound(_) => 7,
        }
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(format!("{:#}", err))
    }
}

/// Writes `error` and every `source()` beneath it to stderr.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error);

    let mut cause = std::error::Error::source(error);
    while let Some(inner) = cause {
        eprintln!("  Caused by: {}", inner);
        cause = inner.source();
    }
}

/// Reports `error` and exits with its status.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}
