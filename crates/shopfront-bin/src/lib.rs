// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # shopfront-bin
//!
//! The `shopfront` binary:
//!
//! - CLI argument parsing with clap
//! - Logging initialization
//! - Server runtime orchestration and graceful shutdown
//! - Operational commands (migrate, validate, assign-role, version)
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! shopfront -c shopfront.yaml
//!
//! # Create the schema and default roles
//! shopfront migrate
//!
//! # Promote the first administrator
//! shopfront assign-role --email root@example.com --role admin
//!
//! # Check a configuration file
//! shopfront validate --strict
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{RuntimeBuilder, ServerRuntime};
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
