// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::Page;
use crate::error::{StoreError, StoreResult};
use crate::models::{NewUser, User, UserChanges};

const USER_COLUMNS: &str = "id, name, email, password_hash, role_id, phone_number, \
     is_verified, verified_at, profile_picture, created_at, updated_at";

/// Access to the `users` table.
#[derive(Debug, Clone, Copy)]
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a user. A duplicate email yields [`StoreError::Conflict`].
    pub async fn create(&self, user: NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, role_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role_id)
            .bind(now)
            .bind(now)
            .fetch_one(self.pool)
            .await?;

        debug!(user_id = created.id, "User created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?)
    }

    /// Like [`find_by_id`](Self::find_by_id) but a missing row is an error.
    pub async fn get(&self, id: i64) -> StoreResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    pub async fn list(&self, page: Page) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT ? OFFSET ?");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn count(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?)
    }

    /// Applies the non-empty fields of `changes`.
    pub async fn update(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let sql = format!(
            "UPDATE users SET \
                 name = COALESCE(?, name), \
                 email = COALESCE(?, email), \
                 password_hash = COALESCE(?, password_hash), \
                 phone_number = COALESCE(?, phone_number), \
                 updated_at = ? \
             WHERE id = ? RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(changes.name)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(changes.phone_number)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    /// Sets or clears the user's role.
    pub async fn set_role(&self, id: i64, role_id: Option<i64>) -> StoreResult<User> {
        let sql = format!(
            "UPDATE users SET role_id = ?, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(role_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("user", id))?;

        debug!(user_id = id, role_id = ?role_id, "User role changed");
        Ok(user)
    }

    /// Deletes the user together with its addresses and tokens.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", id));
        }
        debug!(user_id = id, "User deleted");
        Ok(())
    }
}
