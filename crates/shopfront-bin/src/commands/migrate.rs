// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `migrate` command.

use chrono::Utc;
use shopfront_config::ShopfrontConfig;
use shopfront_store::Store;
use tracing::info;

use crate::error::BinResult;

/// Applies pending migrations and seeds the default catalogue, regardless of
/// the `run_migrations` and `seed_defaults` settings.
pub async fn migrate(config: ShopfrontConfig) -> BinResult<()> {
    let mut store_config = config.store_config();
    store_config.run_migrations = false;
    store_config.seed_defaults = false;

    let store = Store::connect(&store_config).await?;
    let outcome = apply(&store).await;
    store.close().await;

    let (report, purged) = outcome?;
    println!("✓ Migrations applied: {}", store_config.url);
    println!(
        "  Seeded {} role(s), {} permission(s), {} grant(s)",
        report.roles_created, report.permissions_created, report.grants_created
    );
    println!("  Purged {} expired token record(s)", purged);
    Ok(())
}

async fn apply(store: &Store) -> BinResult<(shopfront_store::SeedReport, u64)> {
    store.migrate().await?;
    let report = store.seed_defaults().await?;
    info!(
        roles = report.roles_created,
        permissions = report.permissions_created,
        grants = report.grants_created,
        "Default catalogue seeded"
    );
    let purged = store.tokens().purge_expired(Utc::now()).await?;
    info!(purged, "Expired token records removed");
    Ok((report, purged))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ShopfrontConfig::default();
        config.database.url = format!("sqlite://{}", dir.path().join("shop.db").display());

        migrate(config.clone()).await.unwrap();
        // Idempotent.
        migrate(config.clone()).await.unwrap();

        let mut reopen = config.store_config();
        reopen.run_migrations = false;
        reopen.seed_defaults = false;
        let store = Store::connect(&reopen).await.unwrap();
        assert!(store.roles().find_by_name("admin").await.unwrap().is_some());
        store.close().await;
    }
}
