// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::models::{Cart, CartLine};

const LINE_QUERY: &str = "SELECT ci.id, ci.product_id, p.name AS product_name, \
     p.price_cents AS unit_price_cents, ci.quantity \
     FROM cart_items ci JOIN products p ON p.id = ci.product_id \
     WHERE ci.cart_id = ? ORDER BY ci.id";

const OWNED_ITEM: &str = "id = ? AND cart_id = (SELECT id FROM carts WHERE user_id = ?)";

/// Access to `carts` and `cart_items`. Every operation is keyed by the owning
/// user, so an item id from someone else's cart is simply not found.
#[derive(Debug, Clone, Copy)]
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_for_user(&self, user_id: i64) -> StoreResult<Option<Cart>> {
        let cart_id = sqlx::query_scalar::<_, i64>("SELECT id FROM carts WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;
        let Some(cart_id) = cart_id else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, CartLine>(LINE_QUERY)
            .bind(cart_id)
            .fetch_all(self.pool)
            .await?;
        Ok(Some(Cart::new(cart_id, user_id, items)))
    }

    pub async fn get_for_user(&self, user_id: i64) -> StoreResult<Cart> {
        self.find_for_user(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("cart", user_id))
    }

    /// Adds `quantity` of a product, creating the cart on first use. A product
    /// already in the cart has its quantity raised instead.
    pub async fn add_item(&self, user_id: i64, product_id: i64, quantity: i64) -> StoreResult<Cart> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let cart_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO carts (user_id, created_at, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT (user_id) DO UPDATE SET updated_at = excluded.updated_at \
             RETURNING id",
        )
        .bind(user_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::InvalidReference { .. } => StoreError::not_found("user", user_id),
            other => other,
        })?;

        sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT (cart_id, product_id) DO UPDATE SET \
                 quantity = quantity + excluded.quantity, \
                 updated_at = excluded.updated_at",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::InvalidReference { .. } => StoreError::not_found("product", product_id),
            other => other,
        })?;

        tx.commit().await?;
        debug!(user_id, product_id, quantity, "Cart item added");
        self.get_for_user(user_id).await
    }

    /// Replaces the quantity of an item in the user's cart.
    pub async fn set_quantity(&self, user_id: i64, item_id: i64, quantity: i64) -> StoreResult<Cart> {
        let sql = format!("UPDATE cart_items SET quantity = ?, updated_at = ? WHERE {OWNED_ITEM}");
        let result = sqlx::query(&sql)
            .bind(quantity)
            .bind(Utc::now())
            .bind(item_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("cart item", item_id));
        }
        self.get_for_user(user_id).await
    }

    pub async fn remove_item(&self, user_id: i64, item_id: i64) -> StoreResult<()> {
        let sql = format!("DELETE FROM cart_items WHERE {OWNED_ITEM}");
        let result = sqlx::query(&sql)
            .bind(item_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("cart item", item_id));
        }
        Ok(())
    }

    /// Deletes the user's cart and every item in it.
    pub async fn clear(&self, user_id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM carts WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("cart", user_id));
        }
        debug!(user_id, "Cart cleared");
        Ok(())
    }
}
