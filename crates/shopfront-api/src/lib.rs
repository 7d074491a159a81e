// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # shopfront-api
//!
//! HTTP API for the Shopfront backend.
//!
//! Every protected request runs the same chain:
//!
//! 1. [`auth::TokenCodec`] verifies the bearer token.
//! 2. [`auth::IdentityResolver`] checks revocation and loads the user, role
//!    and permissions in one read.
//! 3. The route's [`auth::RouteGuard`] runs role gates, then permission gates.
//! 4. The handler reads the identity through [`extractors::Identity`].
//!
//! ```rust,ignore
//! use shopfront_api::{ApiConfig, ApiServer, AppState};
//!
//! let state = AppState::builder().config(config).store(store).build()?;
//! ApiServer::new(state).run_with_shutdown(shutdown).await?;
//! ```

#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult, ErrorBody};
pub use server::ApiServer;
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
