// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # shopfront-store
//!
//! SQLite persistence for the Shopfront backend.
//!
//! - [`Store`]: pool lifecycle (open, migrate, seed, ping, close)
//! - [`repository`]: per-table access (`store.users()`, `store.roles()`, ...)
//! - [`catalog`]: default roles and permission names
//! - [`models`]: row types and write payloads
//!
//! ```rust,ignore
//! use shopfront_store::{Store, StoreConfig};
//!
//! let store = Store::connect(&StoreConfig::default()).await?;
//! let identity = store.identities().load(user_id).await?;
//! store.close().await;
//! ```

pub mod catalog;
pub mod error;
pub mod models;
pub mod pool;
pub mod repository;

pub use catalog::{names, DefaultRole, SeedReport};
pub use error::{StoreError, StoreResult};
pub use models::*;
pub use pool::{Store, StoreConfig};
pub use repository::{Page, RoleChanges};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
