// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{StoreError, StoreResult};
use crate::models::{Address, NewAddress};

const ADDRESS_COLUMNS: &str = "id, user_id, address_line1, address_line2, city, state, \
     zip_code, country, is_default, created_at";

/// Access to `user_addresses`.
#[derive(Debug, Clone, Copy)]
pub struct AddressRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AddressRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Address>> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM user_addresses WHERE user_id = ? ORDER BY id"
        );
        Ok(sqlx::query_as::<_, Address>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// Adds an address. A new default address clears the previous default.
    pub async fn create(&self, user_id: i64, address: NewAddress) -> StoreResult<Address> {
        let mut tx = self.pool.begin().await?;

        if address.is_default {
            sqlx::query("UPDATE user_addresses SET is_default = 0 WHERE user_id = ?")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        let sql = format!(
            "INSERT INTO user_addresses (user_id, address_line1, address_line2, city, state, \
             zip_code, country, is_default, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {ADDRESS_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Address>(&sql)
            .bind(user_id)
            .bind(&address.address_line1)
            .bind(&address.address_line2)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.zip_code)
            .bind(&address.country)
            .bind(address.is_default)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match StoreError::from(e) {
                StoreError::InvalidReference { .. } => StoreError::not_found("user", user_id),
                other => other,
            })?;

        tx.commit().await?;
        Ok(created)
    }

    /// Deletes an address owned by `user_id`.
    pub async fn delete(&self, user_id: i64, address_id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM user_addresses WHERE id = ? AND user_id = ?")
            .bind(address_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("address", address_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::Store;

    fn address(line: &str, is_default: bool) -> NewAddress {
        NewAddress {
            address_line1: line.to_string(),
            address_line2: None,
            city: "Lisbon".to_string(),
            state: "Lisboa".to_string(),
            zip_code: "1100-001".to_string(),
            country: "PT".to_string(),
            is_default,
        }
    }

    async fn user(store: &Store, email: &str) -> i64 {
        store
            .users()
            .create(NewUser {
                name: "Addr".to_string(),
                email: email.to_string(),
                password_hash: None,
                role_id: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_single_default_address() {
        let store = Store::in_memory().await.unwrap();
        let user_id = user(&store, "addr@example.com").await;

        store
            .addresses()
            .create(user_id, address("Rua A 1", true))
            .await
            .unwrap();
        store
            .addresses()
            .create(user_id, address("Rua B 2", true))
            .await
            .unwrap();

        let list = store.addresses().list_for_user(user_id).await.unwrap();
        assert_eq!(list.len(), 2);
        assert!(!list[0].is_default);
        assert!(list[1].is_default);
    }

    #[tokio::test]
    async fn test_delete_checks_owner() {
        let store = Store::in_memory().await.unwrap();
        let owner = user(&store, "owner@example.com").await;
        let other = user(&store, "other@example.com").await;

        let created = store
            .addresses()
            .create(owner, address("Rua C 3", false))
            .await
            .unwrap();

        let err = store.addresses().delete(other, created.id).await.unwrap_err();
        assert!(err.is_not_found());
        store.addresses().delete(owner, created.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_for_missing_user() {
        let store = Store::in_memory().await.unwrap();
        let err = store
            .addresses()
            .create(404, address("Nowhere", false))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "user", .. }));
    }
}
