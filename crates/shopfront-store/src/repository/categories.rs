// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::products::PRODUCT_COLUMNS;
use crate::error::{StoreError, StoreResult};
use crate::models::{Category, CategoryChanges, NewCategory, Product};

const CATEGORY_COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Access to `categories`.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a category. A duplicate name yields [`StoreError::Conflict`].
    pub async fn create(&self, category: NewCategory) -> StoreResult<Category> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO categories (name, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?) RETURNING {CATEGORY_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Category>(&sql)
            .bind(&category.name)
            .bind(&category.description)
            .bind(now)
            .bind(now)
            .fetch_one(self.pool)
            .await?;

        debug!(category_id = created.id, "Category created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> StoreResult<Category> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?");
        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("category", id))
    }

    pub async fn list(&self) -> StoreResult<Vec<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name");
        Ok(sqlx::query_as::<_, Category>(&sql)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn update(&self, id: i64, changes: CategoryChanges) -> StoreResult<Category> {
        let sql = format!(
            "UPDATE categories SET \
                 name = COALESCE(?, name), \
                 description = COALESCE(?, description), \
                 updated_at = ? \
             WHERE id = ? RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(changes.name)
            .bind(changes.description)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("category", id))
    }

    /// Deletes a category. Its products stay in the catalogue uncategorised.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("category", id));
        }
        Ok(())
    }

    /// Products filed under an existing category.
    pub async fn products(&self, id: i64) -> StoreResult<Vec<Product>> {
        self.get(id).await?;
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = ? ORDER BY id");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_all(self.pool)
            .await?)
    }
}
