// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::models::{Permission, Role, RoleWithPermissions};

const ROLE_COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Changes applied by [`RoleRepository::update`].
#[derive(Debug, Clone, Default)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    /// When present, replaces the role's whole permission set.
    pub permission_ids: Option<Vec<i64>>,
}

#[derive(FromRow)]
struct GrantRow {
    role_id: i64,
    #[sqlx(flatten)]
    permission: Permission,
}

/// Access to `roles` and the role side of `role_permissions`.
#[derive(Debug, Clone, Copy)]
pub struct RoleRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RoleRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<Role>> {
        let sql = format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = ?");
        Ok(sqlx::query_as::<_, Role>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    pub async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        let sql = format!("SELECT {ROLE_COLUMNS} FROM roles WHERE name = ?");
        Ok(sqlx::query_as::<_, Role>(&sql)
            .bind(name)
            .fetch_optional(self.pool)
            .await?)
    }

    /// Returns the role and its permissions.
    pub async fn get_with_permissions(&self, id: i64) -> StoreResult<RoleWithPermissions> {
        let role = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("role", id))?;
        let permissions = self.permissions_of(id).await?;
        Ok(RoleWithPermissions { role, permissions })
    }

    /// Returns every role with its permissions.
    pub async fn list_with_permissions(&self) -> StoreResult<Vec<RoleWithPermissions>> {
        let sql = format!("SELECT {ROLE_COLUMNS} FROM roles ORDER BY id");
        let roles = sqlx::query_as::<_, Role>(&sql).fetch_all(self.pool).await?;

        let grants = sqlx::query_as::<_, GrantRow>(
            "SELECT rp.role_id, p.id, p.name, p.description, p.created_at, p.updated_at \
             FROM role_permissions rp \
             JOIN permissions p ON p.id = rp.permission_id \
             ORDER BY p.id",
        )
        .fetch_all(self.pool)
        .await?;

        let mut by_role: HashMap<i64, Vec<Permission>> = HashMap::new();
        for grant in grants {
            by_role.entry(grant.role_id).or_default().push(grant.permission);
        }

        Ok(roles
            .into_iter()
            .map(|role| {
                let permissions = by_role.remove(&role.id).unwrap_or_default();
                RoleWithPermissions { role, permissions }
            })
            .collect())
    }

    /// Permissions granted to `role_id`.
    pub async fn permissions_of(&self, role_id: i64) -> StoreResult<Vec<Permission>> {
        Ok(sqlx::query_as::<_, Permission>(
            "SELECT p.id, p.name, p.description, p.created_at, p.updated_at \
             FROM permissions p \
             JOIN role_permissions rp ON rp.permission_id = p.id \
             WHERE rp.role_id = ? ORDER BY p.id",
        )
        .bind(role_id)
        .fetch_all(self.pool)
        .await?)
    }

    /// Creates a role and grants it `permission_ids` atomically.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        permission_ids: &[i64],
    ) -> StoreResult<RoleWithPermissions> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO roles (name, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?) RETURNING {ROLE_COLUMNS}"
        );
        let role = sqlx::query_as::<_, Role>(&sql)
            .bind(name)
            .bind(description)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        grant_all(&mut tx, role.id, permission_ids).await?;
        tx.commit().await?;

        debug!(role_id = role.id, role = %role.name, "Role created");
        self.get_with_permissions(role.id).await
    }

    /// Updates a role. Replacing its permissions happens in the same
    /// transaction as the column update.
    pub async fn update(&self, id: i64, changes: RoleChanges) -> StoreResult<RoleWithPermissions> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE roles SET name = COALESCE(?, name), \
             description = COALESCE(?, description), updated_at = ? WHERE id = ?",
        )
        .bind(changes.name)
        .bind(changes.description)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::not_found("role", id));
        }

        if let Some(permission_ids) = changes.permission_ids {
            sqlx::query("DELETE FROM role_permissions WHERE role_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            grant_all(&mut tx, id, &permission_ids).await?;
        }

        tx.commit().await?;
        debug!(role_id = id, "Role updated");
        self.get_with_permissions(id).await
    }

    /// Deletes a role. Its grants are removed and its users lose the role.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("role", id));
        }
        debug!(role_id = id, "Role deleted");
        Ok(())
    }
}

async fn grant_all(
    tx: &mut Transaction<'_, Sqlite>,
    role_id: i64,
    permission_ids: &[i64],
) -> StoreResult<()> {
    let now = Utc::now();
    for permission_id in permission_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO role_permissions (role_id, permission_id, created_at) \
             VALUES (?, ?, ?)",
        )
        .bind(role_id)
        .bind(permission_id)
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::InvalidReference { .. } => StoreError::not_found("permission", permission_id),
            other => other,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::names;
    use crate::models::NewUser;
    use crate::Store;

    #[tokio::test]
    async fn test_list_seeded_roles() {
        let store = Store::in_memory().await.unwrap();
        let roles = store.roles().list_with_permissions().await.unwrap();

        let role_names: Vec<_> = roles.iter().map(|r| r.role.name.as_str()).collect();
        assert_eq!(role_names, vec!["admin", "customer", "merchant"]);
        assert_eq!(roles[0].permissions.len(), names::ALL.len());
        assert_eq!(roles[2].permissions.len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_permissions() {
        let store = Store::in_memory().await.unwrap();
        let view = store
            .permissions()
            .find_by_name(names::VIEW_USERS)
            .await
            .unwrap()
            .unwrap();

        let role = store
            .roles()
            .create("support", Some("Support desk"), &[view.id])
            .await
            .unwrap();
        assert_eq!(role.role.name, "support");
        assert_eq!(role.permissions, vec![view]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_permission_rolls_back() {
        let store = Store::in_memory().await.unwrap();

        let err = store
            .roles()
            .create("ghost", None, &[9999])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.roles().find_by_name("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_permissions() {
        let store = Store::in_memory().await.unwrap();
        let merchant = store.roles().find_by_name("merchant").await.unwrap().unwrap();
        let view = store
            .permissions()
            .find_by_name(names::VIEW_ANALYTICS)
            .await
            .unwrap()
            .unwrap();

        let updated = store
            .roles()
            .update(
                merchant.id,
                RoleChanges {
                    description: Some("Sells things".to_string()),
                    permission_ids: Some(vec![view.id]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.role.name, "merchant");
        assert_eq!(updated.role.description.as_deref(), Some("Sells things"));
        assert_eq!(updated.permissions.len(), 1);
        assert_eq!(updated.permissions[0].name, names::VIEW_ANALYTICS);
    }

    #[tokio::test]
    async fn test_delete_cascades_grants_and_nulls_users() {
        let store = Store::in_memory().await.unwrap();
        let customer = store.roles().find_by_name("customer").await.unwrap().unwrap();
        let user = store
            .users()
            .create(NewUser {
                name: "C".to_string(),
                email: "c@example.com".to_string(),
                password_hash: None,
                role_id: Some(customer.id),
            })
            .await
            .unwrap();

        store.roles().delete(customer.id).await.unwrap();

        let grants: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM role_permissions WHERE role_id = ?")
                .bind(customer.id)
                .fetch_one(store.pool())
                .await
                .unwrap();
        assert_eq!(grants, 0);

        let user = store.users().get(user.id).await.unwrap();
        assert_eq!(user.role_id, None);
    }
}
