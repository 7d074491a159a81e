// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::Page;
use crate::error::{StoreError, StoreResult};
use crate::models::{NewProduct, Product, ProductChanges};

pub(super) const PRODUCT_COLUMNS: &str = "id, name, price_cents, description, stock, sku, \
     is_featured, image_url, category_id, created_at, updated_at";

/// A dangling `category_id` is reported as the missing category.
fn missing_category(err: sqlx::Error, category_id: Option<i64>) -> StoreError {
    match (StoreError::from(err), category_id) {
        (StoreError::InvalidReference { .. }, Some(id)) => StoreError::not_found("category", id),
        (other, _) => other,
    }
}

/// Access to `products`.
#[derive(Debug, Clone, Copy)]
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a product. A duplicate SKU yields [`StoreError::Conflict`].
    pub async fn create(&self, product: NewProduct) -> StoreResult<Product> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO products (name, price_cents, description, stock, sku, is_featured, \
             image_url, category_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {PRODUCT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(product.price_cents)
            .bind(&product.description)
            .bind(product.stock)
            .bind(&product.sku)
            .bind(product.is_featured)
            .bind(&product.image_url)
            .bind(product.category_id)
            .bind(now)
            .bind(now)
            .fetch_one(self.pool)
            .await
            .map_err(|e| missing_category(e, product.category_id))?;

        debug!(product_id = created.id, sku = %created.sku, "Product created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    pub async fn get(&self, id: i64) -> StoreResult<Product> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    pub async fn list(&self, page: Page) -> StoreResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id LIMIT ? OFFSET ?");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn count(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?)
    }

    /// Applies the non-empty fields of `changes`.
    pub async fn update(&self, id: i64, changes: ProductChanges) -> StoreResult<Product> {
        let category_id = changes.category_id;
        let sql = format!(
            "UPDATE products SET \
                 name = COALESCE(?, name), \
                 price_cents = COALESCE(?, price_cents), \
                 description = COALESCE(?, description), \
                 stock = COALESCE(?, stock), \
                 sku = COALESCE(?, sku), \
                 is_featured = COALESCE(?, is_featured), \
                 image_url = COALESCE(?, image_url), \
                 category_id = COALESCE(?, category_id), \
                 updated_at = ? \
             WHERE id = ? RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(changes.name)
            .bind(changes.price_cents)
            .bind(changes.description)
            .bind(changes.stock)
            .bind(changes.sku)
            .bind(changes.is_featured)
            .bind(changes.image_url)
            .bind(category_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| missing_category(e, category_id))?
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    /// Deletes a product. Cart and wishlist entries go with it; order lines
    /// keep their snapshot.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("product", id));
        }
        debug!(product_id = id, "Product deleted");
        Ok(())
    }
}
