// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{StoreError, StoreResult};
use crate::models::WishlistEntry;

const ENTRY_QUERY: &str = "SELECT w.id, w.product_id, p.name AS product_name, p.price_cents, \
     w.created_at FROM wishlist_items w JOIN products p ON p.id = w.product_id";

/// Access to `wishlist_items`.
#[derive(Debug, Clone, Copy)]
pub struct WishlistRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> WishlistRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<WishlistEntry>> {
        let sql = format!("{ENTRY_QUERY} WHERE w.user_id = ? ORDER BY w.id");
        Ok(sqlx::query_as::<_, WishlistEntry>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// Adds a product. Adding it twice yields [`StoreError::Conflict`].
    pub async fn add(&self, user_id: i64, product_id: i64) -> StoreResult<WishlistEntry> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO wishlist_items (user_id, product_id, created_at) VALUES (?, ?, ?) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::InvalidReference { .. } => StoreError::not_found("product", product_id),
            other => other,
        })?;

        let sql = format!("{ENTRY_QUERY} WHERE w.id = ?");
        Ok(sqlx::query_as::<_, WishlistEntry>(&sql)
            .bind(id)
            .fetch_one(self.pool)
            .await?)
    }

    pub async fn remove(&self, user_id: i64, product_id: i64) -> StoreResult<()> {
        let result =
            sqlx::query("DELETE FROM wishlist_items WHERE user_id = ? AND product_id = ?")
                .bind(user_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("wishlist item", product_id));
        }
        Ok(())
    }
}
