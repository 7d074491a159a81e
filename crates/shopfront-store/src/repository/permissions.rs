// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::models::{Permission, RolePermission};

const PERMISSION_COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Access to `permissions` and role grants.
#[derive(Debug, Clone, Copy)]
pub struct PermissionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PermissionRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> StoreResult<Vec<Permission>> {
        let sql = format!("SELECT {PERMISSION_COLUMNS} FROM permissions ORDER BY id");
        Ok(sqlx::query_as::<_, Permission>(&sql)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<Permission>> {
        let sql = format!("SELECT {PERMISSION_COLUMNS} FROM permissions WHERE id = ?");
        Ok(sqlx::query_as::<_, Permission>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    pub async fn find_by_name(&self, name: &str) -> StoreResult<Option<Permission>> {
        let sql = format!("SELECT {PERMISSION_COLUMNS} FROM permissions WHERE name = ?");
        Ok(sqlx::query_as::<_, Permission>(&sql)
            .bind(name)
            .fetch_optional(self.pool)
            .await?)
    }

    pub async fn create(&self, name: &str, description: Option<&str>) -> StoreResult<Permission> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO permissions (name, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?) RETURNING {PERMISSION_COLUMNS}"
        );
        let permission = sqlx::query_as::<_, Permission>(&sql)
            .bind(name)
            .bind(description)
            .bind(now)
            .bind(now)
            .fetch_one(self.pool)
            .await?;

        debug!(permission = %permission.name, "Permission created");
        Ok(permission)
    }

    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> StoreResult<Permission> {
        let sql = format!(
            "UPDATE permissions SET name = COALESCE(?, name), \
             description = COALESCE(?, description), updated_at = ? \
             WHERE id = ? RETURNING {PERMISSION_COLUMNS}"
        );
        sqlx::query_as::<_, Permission>(&sql)
            .bind(name)
            .bind(description)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("permission", id))
    }

    /// Deletes a permission and every grant of it.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("permission", id));
        }
        debug!(permission_id = id, "Permission deleted");
        Ok(())
    }

    /// Grants a permission to a role.
    ///
    /// Unknown role or permission ids are reported as not found; an existing
    /// grant is a conflict.
    pub async fn assign(&self, role_id: i64, permission_id: i64) -> StoreResult<RolePermission> {
        let mut tx = self.pool.begin().await?;

        let role_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE id = ?)")
            .bind(role_id)
            .fetch_one(&mut *tx)
            .await?;
        if !role_exists {
            return Err(StoreError::not_found("role", role_id));
        }

        let permission_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM permissions WHERE id = ?)")
                .bind(permission_id)
                .fetch_one(&mut *tx)
                .await?;
        if !permission_exists {
            return Err(StoreError::not_found("permission", permission_id));
        }

        let grant = sqlx::query_as::<_, RolePermission>(
            "INSERT INTO role_permissions (role_id, permission_id, created_at) \
             VALUES (?, ?, ?) RETURNING id, role_id, permission_id, created_at",
        )
        .bind(role_id)
        .bind(permission_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(role_id, permission_id, "Permission assigned");
        Ok(grant)
    }

    /// Removes a grant.
    pub async fn revoke(&self, role_id: i64, permission_id: i64) -> StoreResult<()> {
        let result =
            sqlx::query("DELETE FROM role_permissions WHERE role_id = ? AND permission_id = ?")
                .bind(role_id)
                .bind(permission_id)
                .execute(self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(
                "role permission",
                format!("{role_id}/{permission_id}"),
            ));
        }
        debug!(role_id, permission_id, "Permission revoked");
        Ok(())
    }
}
