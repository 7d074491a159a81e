// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use shopfront_config::ShopfrontConfig;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Recommended minimum secret length for HMAC signing.
const MIN_SECRET_LEN: usize = 32;

/// Loads and validates the configuration without starting the server.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let source = cli
        .config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(environment)".to_string());

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            if args.format == OutputFormat::Json {
                let output = serde_json::json!({
                    "valid": false,
                    "config_path": source,
                    "error": e.to_string(),
                });
                println!("{}", to_pretty(&output)?);
            }
            return Err(e.with_context("Configuration validation failed"));
        }
    };

    let warnings = collect_warnings(&config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", source);
            println!();
            println!("Summary:");
            println!("  Listen:      {}:{}", config.server.host, config.server.port);
            println!("  Database:    {}", config.database.url);
            println!("  Pool size:   {}", config.database.max_connections);
            println!("  Issuer:      {}", config.auth.issuer);
            println!("  Token TTL:   {}s", config.auth.expiration_secs);
            println!(
                "  Logging:     {} ({:?})",
                config.logging.level, config.logging.format
            );

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration (secret omitted):");
                println!("{}", to_pretty(&config)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": source,
                "summary": {
                    "host": config.server.host.to_string(),
                    "port": config.server.port,
                    "database_url": config.database.url,
                    "max_connections": config.database.max_connections,
                    "issuer": config.auth.issuer,
                    "expiration_secs": config.auth.expiration_secs,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!("{}", to_pretty(&output)?);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Settings that are valid but likely unintended in production.
pub fn collect_warnings(config: &ShopfrontConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.auth.secret.len() < MIN_SECRET_LEN {
        warnings.push(format!(
            "JWT secret is shorter than {} bytes",
            MIN_SECRET_LEN
        ));
    }
    if config.server.cors.allows_any_origin() {
        warnings.push("CORS allows any origin".to_string());
    }
    if config.store_config().is_in_memory() {
        warnings.push("Database is in memory; data is lost on exit".to_string());
    }
    if !config.database.run_migrations {
        warnings.push("Migrations are disabled; run `shopfront migrate` first".to_string());
    }

    warnings
}

fn to_pretty<T: serde::Serialize>(value: &T) -> BinResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| BinError::runtime(format!("Failed to render output: {}", e)))
}
