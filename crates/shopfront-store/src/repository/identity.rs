// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use sqlx::SqlitePool;

use crate::error::StoreResult;
use crate::models::IdentityRecord;

type IdentityRow = (i64, String, String, Option<String>, Option<String>);

/// Reads a user, its role and the role's permissions in one statement.
#[derive(Debug, Clone, Copy)]
pub struct IdentityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> IdentityRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Loads the identity of `user_id`, or `None` if no such user exists.
    ///
    /// A user without a role, or with a role that has no permissions, still
    /// yields one row from the outer joins.
    pub async fn load(&self, user_id: i64) -> StoreResult<Option<IdentityRecord>> {
        let rows = sqlx::query_as::<_, IdentityRow>(
            "SELECT u.id, u.name, u.email, r.name, p.name \
             FROM users u \
             LEFT JOIN roles r ON r.id = u.role_id \
             LEFT JOIN role_permissions rp ON rp.role_id = r.id \
             LEFT JOIN permissions p ON p.id = rp.permission_id \
             WHERE u.id = ? \
             ORDER BY p.name",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut rows = rows.into_iter();
        let Some((id, name, email, role, first)) = rows.next() else {
            return Ok(None);
        };

        let permissions = first
            .into_iter()
            .chain(rows.filter_map(|(.., permission)| permission))
            .collect();

        Ok(Some(IdentityRecord {
            user_id: id,
            name,
            email,
            role,
            permissions,
        }))
    }
}
