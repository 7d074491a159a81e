// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use crate::models::{AuthToken, NewAuthToken};

const TOKEN_COLUMNS: &str = "id, user_id, token, token_type, expires_at, is_revoked, created_at";

/// Revocation bookkeeping for issued tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TokenRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, token: NewAuthToken) -> StoreResult<AuthToken> {
        let sql = format!(
            "INSERT INTO auth_tokens (user_id, token, token_type, expires_at, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {TOKEN_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, AuthToken>(&sql)
            .bind(token.user_id)
            .bind(&token.token)
            .bind(&token.token_type)
            .bind(token.expires_at)
            .bind(Utc::now())
            .fetch_one(self.pool)
            .await?)
    }

    pub async fn find_by_token(&self, token: &str) -> StoreResult<Option<AuthToken>> {
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM auth_tokens WHERE token = ?");
        Ok(sqlx::query_as::<_, AuthToken>(&sql)
            .bind(token)
            .fetch_optional(self.pool)
            .await?)
    }

    /// Marks a token revoked. Returns `false` if no record exists for it.
    pub async fn revoke(&self, token: &str) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE auth_tokens SET is_revoked = 1 WHERE token = ?")
            .bind(token)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revokes every outstanding token of a user.
    pub async fn revoke_all_for_user(&self, user_id: i64) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE auth_tokens SET is_revoked = 1 WHERE user_id = ? AND is_revoked = 0",
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;
        debug!(user_id, revoked = result.rows_affected(), "Revoked user tokens");
        Ok(result.rows_affected())
    }

    /// Removes records that expired before `now`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at < ?")
            .bind(now)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::Store;
    use chrono::Duration;

    async fn user(store: &Store) -> i64 {
        store
            .users()
            .create(NewUser {
                name: "T".to_string(),
                email: "t@example.com".to_string(),
                password_hash: None,
                role_id: None,
            })
            .await
            .unwrap()
            .id
    }

    fn new_token(user_id: i64, token: &str, expires_at: DateTime<Utc>) -> NewAuthToken {
        NewAuthToken {
            user_id,
            token: token.to_string(),
            token_type: "access".to_string(),
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_insert_and_revoke() {
        let store = Store::in_memory().await.unwrap();
        let user_id = user(&store).await;
        let expires = Utc::now() + Duration::hours(1);

        let record = store
            .tokens()
            .insert(new_token(user_id, "tok-1", expires))
            .await
            .unwrap();
        assert!(record.is_usable_at(Utc::now()));

        assert!(store.tokens().revoke("tok-1").await.unwrap());
        assert!(!store.tokens().revoke("unknown").await.unwrap());

        let record = store.tokens().find_by_token("tok-1").await.unwrap().unwrap();
        assert!(record.is_revoked);
        assert!(!record.is_usable_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_revoke_all_and_purge() {
        let store = Store::in_memory().await.unwrap();
        let user_id = user(&store).await;
        let now = Utc::now();

        let tokens = store.tokens();
        tokens
            .insert(new_token(user_id, "live", now + Duration::hours(1)))
            .await
            .unwrap();
        tokens
            .insert(new_token(user_id, "stale", now - Duration::hours(1)))
            .await
            .unwrap();

        assert_eq!(tokens.revoke_all_for_user(user_id).await.unwrap(), 2);
        assert_eq!(tokens.purge_expired(now).await.unwrap(), 1);
        assert!(tokens.find_by_token("stale").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tokens_removed_with_user() {
        let store = Store::in_memory().await.unwrap();
        let user_id = user(&store).await;
        store
            .tokens()
            .insert(new_token(user_id, "gone", Utc::now() + Duration::hours(1)))
            .await
            .unwrap();

        store.users().delete(user_id).await.unwrap();
        assert!(store.tokens().find_by_token("gone").await.unwrap().is_none());
    }
}
