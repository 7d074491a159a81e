// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shopfront server entry point.

use shopfront_bin::error::report_error_and_exit;
use shopfront_bin::{commands, init_logging, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let config = if cli.needs_config() {
        match cli.load_config() {
            Ok(config) => Some(config),
            Err(e) => report_error_and_exit(e),
        }
    } else {
        None
    };

    let level = cli.effective_log_level(config.as_ref());
    let format = cli.effective_log_format(config.as_ref());
    if let Err(e) = init_logging(&level, format) {
        report_error_and_exit(e);
    }

    if let Err(e) = commands::execute(cli, config).await {
        report_error_and_exit(e);
    }
}
