// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Process-wide `tracing` subscriber.

use std::io::IsTerminal;

use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::cli::LogFormat;
use crate::error::{BinError, BinResult};

/// Dependencies that would otherwise log every connection and query.
const QUIET_TARGETS: &str = "hyper=warn,tower=warn,tower_http=info,sqlx=warn";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber. `RUST_LOG`, when set, replaces `level`.
pub fn init_logging(level: &str, format: LogFormat) -> BinResult<()> {
    let filter = build_filter(level)?;

    tracing_subscriber::registry()
        .with(output_layer(format))
        .with(filter)
        .try_init()
        .map_err(|e| BinError::init(format!("Failed to install log subscriber: {}", e)))
}

fn output_layer(format: LogFormat) -> BoxedLayer {
    let ansi = std::io::stdout().is_terminal();
    match format {
        LogFormat::Text => fmt::layer().with_ansi(ansi).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(false).with_ansi(ansi).boxed(),
        // One object per line; request spans from TraceLayer are flattened in.
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    }
}

/// `RUST_LOG` if set, else `level` for our crates with noisy
/// dependencies held back.
pub fn build_filter(level: &str) -> BinResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(format!("{},{}", parse_level(level), QUIET_TARGETS))
            .map_err(|e| BinError::config(format!("Invalid log filter: {}", e))),
    }
}

/// Case-insensitive level name; anything unrecognised is `INFO`.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level(" warning "), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn test_filter_accepts_any_level_string() {
        assert!(build_filter("trace").is_ok());
        assert!(build_filter("nonsense").is_ok());
    }
}
