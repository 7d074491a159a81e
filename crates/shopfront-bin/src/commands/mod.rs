// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod assign_role;
mod migrate;
mod run;
mod validate;
mod version;

pub use assign_role::assign_role;
pub use migrate::migrate;
pub use run::run;
pub use validate::validate;
pub use version::version;

use shopfront_config::ShopfrontConfig;

use crate::cli::{Cli, Commands};
use crate::error::{BinError, BinResult};

/// Executes the command selected on the command line.
///
/// `config` is the configuration loaded up front for commands where
/// [`Cli::needs_config`] holds.
pub async fn execute(cli: Cli, config: Option<ShopfrontConfig>) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Run => run::run(required(config)?).await,
        Commands::Migrate => migrate::migrate(required(config)?).await,
        Commands::AssignRole(args) => assign_role::assign_role(required(config)?, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Version => version::version(),
    }
}

fn required(config: Option<ShopfrontConfig>) -> BinResult<ShopfrontConfig> {
    config.ok_or_else(|| BinError::config("Configuration was not loaded"))
}
