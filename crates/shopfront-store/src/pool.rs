// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Connection pool lifecycle.
//!
//! The [`Store`] is opened once at startup, cloned into every component that
//! needs database access and closed at shutdown.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::catalog::{self, SeedReport};
use crate::error::{StoreError, StoreResult};
use crate::repository::{
    AddressRepository, AnalyticsRepository, CartRepository, CategoryRepository,
    IdentityRepository, OrderRepository, PermissionRepository, ProductRepository,
    RoleRepository, TokenRepository, UserRepository, WishlistRepository,
};

// =============================================================================
// StoreConfig
// =============================================================================

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite connection url (`sqlite://shopfront.db`, `sqlite::memory:`).
    pub url: String,

    /// Maximum pool size.
    pub max_connections: u32,

    /// Seconds to wait for a free connection.
    pub acquire_timeout_secs: u64,

    /// Apply pending migrations when the store is opened.
    pub run_migrations: bool,

    /// Insert the default roles and permissions when the store is opened.
    pub seed_defaults: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://shopfront.db".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 5,
            run_migrations: true,
            seed_defaults: true,
        }
    }
}

impl StoreConfig {
    /// Configuration for a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }

    /// Returns `true` if the url addresses an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.url.trim().is_empty() {
            return Err(StoreError::configuration("database url cannot be empty"));
        }
        if self.max_connections == 0 {
            return Err(StoreError::configuration(
                "max_connections must be greater than 0",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Store
// =============================================================================

/// Shared handle to the relational store.
///
/// Cloning is cheap; all clones share one pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens the pool described by `config`, then migrates and seeds as
    /// requested.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(if config.is_in_memory() {
                SqliteJournalMode::Memory
            } else {
                SqliteJournalMode::Wal
            });

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));

        // Every connection to `sqlite::memory:` is a separate database, so the
        // pool is pinned to one connection that is never recycled.
        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.max_connections(config.max_connections);
        }

        let pool = pool_options.connect_with(options).await?;
        info!(url = %config.url, "Database pool opened");

        let store = Self { pool };
        if config.run_migrations {
            store.migrate().await?;
        }
        if config.seed_defaults {
            store.seed_defaults().await?;
        }
        Ok(store)
    }

    /// Opens a migrated and seeded in-memory store.
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect(&StoreConfig::in_memory()).await
    }

    /// Applies pending schema migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("Migrations applied");
        Ok(())
    }

    /// Inserts the default roles and permissions. Idempotent.
    pub async fn seed_defaults(&self) -> StoreResult<SeedReport> {
        catalog::seed(&self.pool).await
    }

    /// Round-trips a trivial statement to check the database is reachable.
    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Closes the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    pub fn roles(&self) -> RoleRepository<'_> {
        RoleRepository::new(&self.pool)
    }

    pub fn permissions(&self) -> PermissionRepository<'_> {
        PermissionRepository::new(&self.pool)
    }

    pub fn tokens(&self) -> TokenRepository<'_> {
        TokenRepository::new(&self.pool)
    }

    pub fn addresses(&self) -> AddressRepository<'_> {
        AddressRepository::new(&self.pool)
    }

    pub fn analytics(&self) -> AnalyticsRepository<'_> {
        AnalyticsRepository::new(&self.pool)
    }

    pub fn categories(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(&self.pool)
    }

    pub fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(&self.pool)
    }

    pub fn carts(&self) -> CartRepository<'_> {
        CartRepository::new(&self.pool)
    }

    pub fn wishlists(&self) -> WishlistRepository<'_> {
        WishlistRepository::new(&self.pool)
    }

    pub fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(&self.pool)
    }

    /// Single-statement identity reads used by the request resolver.
    pub fn identities(&self) -> IdentityRepository<'_> {
        IdentityRepository::new(&self.pool)
    }
}
