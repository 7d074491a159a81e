// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: Start the API server (default)
//! - `migrate`: Apply migrations and seed the default catalogue
//! - `validate`: Validate the configuration file
//! - `assign-role`: Set a user's role by email
//! - `version`: Show version information

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use shopfront_config::{ConfigLoader, ShopfrontConfig};

use crate::error::BinResult;

/// Configuration file read when `--config` is not given, if present.
pub const DEFAULT_CONFIG_PATH: &str = "shopfront.yaml";

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Shopfront - e-commerce REST backend
#[derive(Parser, Debug)]
#[command(
    name = "shopfront",
    author = "Sylvex <contact@sylvex.io>",
    version = shopfront_api::VERSION,
    about = "Shopfront e-commerce REST backend",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (YAML, TOML or JSON)
    #[arg(short, long, env = "SHOPFRONT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format. Overrides the config file.
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server
    ///
    /// This is the default command when no subcommand is specified.
    Run,

    /// Apply database migrations and seed default roles and permissions
    Migrate,

    /// Validate the configuration file without starting the server
    Validate(ValidateArgs),

    /// Assign a role to the user with the given email
    ///
    /// Used to bootstrap the first administrator.
    #[command(name = "assign-role")]
    AssignRole(AssignRoleArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `assign-role` command.
#[derive(Args, Debug, Clone)]
pub struct AssignRoleArgs {
    /// Email of the user
    #[arg(short, long)]
    pub email: String,

    /// Role name (admin, customer, merchant or a custom role)
    #[arg(short, long)]
    pub role: String,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<shopfront_config::LogFormat> for LogFormat {
    fn from(format: shopfront_config::LogFormat) -> Self {
        match format {
            shopfront_config::LogFormat::Text => LogFormat::Text,
            shopfront_config::LogFormat::Json => LogFormat::Json,
            shopfront_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }

    /// Returns `true` if the command runs against a loaded configuration.
    ///
    /// `validate` loads the file itself so it can report failures in its own
    /// output format.
    pub fn needs_config(&self) -> bool {
        matches!(
            self.effective_command(),
            Commands::Run | Commands::Migrate | Commands::AssignRole(_)
        )
    }

    /// The configuration file to read, if any.
    ///
    /// Without `--config`, `shopfront.yaml` in the working directory is used
    /// when it exists.
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                default.exists().then(|| default.to_path_buf())
            }
        }
    }

    /// Loads the configuration file, or builds one from `SHOPFRONT_*`
    /// variables when there is no file.
    pub fn load_config(&self) -> BinResult<ShopfrontConfig> {
        let loader = ConfigLoader::new();
        let config = match self.config_path() {
            Some(path) => loader.load(path)?,
            None => loader.load_from_env()?,
        };
        Ok(config)
    }

    /// Get the effective log level: `-q`, then `-v`, then `--log-level`,
    /// then the config file.
    pub fn effective_log_level(&self, config: Option<&ShopfrontConfig>) -> String {
        if self.quiet {
            "warn".to_string()
        } else if self.verbose {
            "debug".to_string()
        } else if let Some(level) = &self.log_level {
            level.clone()
        } else {
            config
                .map(|c| c.logging.level.as_str())
                .unwrap_or("info")
                .to_string()
        }
    }

    /// Get the effective log format: `--log-format`, then the config file.
    pub fn effective_log_format(&self, config: Option<&ShopfrontConfig>) -> LogFormat {
        self.log_format
            .or_else(|| config.map(|c| c.logging.format.into()))
            .unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_config::LogLevel;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["shopfront"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Run));
        assert!(cli.needs_config());
    }

    #[test]
    fn test_migrate_command() {
        let cli = Cli::parse_from(["shopfront", "migrate"]);
        assert!(matches!(cli.command, Some(Commands::Migrate)));
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["shopfront", "validate", "--show-config", "-f", "json"]);
        if let Some(Commands::Validate(args)) = &cli.command {
            assert!(args.show_config);
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("Expected Validate command");
        }
        assert!(!cli.needs_config());
    }

    #[test]
    fn test_assign_role_command() {
        let cli = Cli::parse_from([
            "shopfront",
            "assign-role",
            "--email",
            "root@example.com",
            "--role",
            "admin",
        ]);
        if let Some(Commands::AssignRole(args)) = cli.command {
            assert_eq!(args.email, "root@example.com");
            assert_eq!(args.role, "admin");
        } else {
            panic!("Expected AssignRole command");
        }
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["shopfront", "-c", "/etc/shopfront/config.toml"]);
        assert_eq!(
            cli.config_path(),
            Some(PathBuf::from("/etc/shopfront/config.toml"))
        );
    }

    #[test]
    fn test_log_level_precedence() {
        let mut config = ShopfrontConfig::default();
        config.logging.level = LogLevel::Error;
        config.logging.format = shopfront_config::LogFormat::Json;

        let cli = Cli::parse_from(["shopfront"]);
        assert_eq!(cli.effective_log_level(Some(&config)), "error");
        assert_eq!(cli.effective_log_level(None), "info");
        assert_eq!(cli.effective_log_format(Some(&config)), LogFormat::Json);

        let cli = Cli::parse_from(["shopfront", "-l", "trace", "--log-format", "compact"]);
        assert_eq!(cli.effective_log_level(Some(&config)), "trace");
        assert_eq!(cli.effective_log_format(Some(&config)), LogFormat::Compact);

        let cli = Cli::parse_from(["shopfront", "-q", "-l", "trace"]);
        assert_eq!(cli.effective_log_level(Some(&config)), "warn");

        let cli = Cli::parse_from(["shopfront", "-v"]);
        assert_eq!(cli.effective_log_level(None), "debug");
    }
}
