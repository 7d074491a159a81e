// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity resolution: verified subject id to [`IdentityContext`].

use chrono::Utc;
use shopfront_store::{Store, StoreError};
use thiserror::Error;

use super::IdentityContext;

/// Reasons an identity cannot be resolved.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The token's subject no longer exists.
    #[error("User {0} not found")]
    UserNotFound(i64),

    /// The token's persisted record is revoked or past its expiry.
    #[error("Token has been revoked")]
    Revoked,

    /// The store could not be read.
    #[error("Identity lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// Loads the current identity behind a verified token.
///
/// Holds no state besides the store handle; every call reads the database.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    store: Store,
}

impl IdentityResolver {
    /// Creates a resolver reading from `store`.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Loads the user, role and role permissions of `subject_id` in a single
    /// read.
    pub async fn resolve(&self, subject_id: i64) -> Result<IdentityContext, ResolveError> {
        let record = self
            .store
            .identities()
            .load(subject_id)
            .await?
            .ok_or(ResolveError::UserNotFound(subject_id))?;

        Ok(IdentityContext::from_record(record))
    }

    /// Fails if `token` has a persisted record that is revoked or expired.
    ///
    /// Tokens without a record were not issued through login and are
    /// governed by their signature and expiry alone.
    pub async fn ensure_not_revoked(&self, token: &str) -> Result<(), ResolveError> {
        match self.store.tokens().find_by_token(token).await? {
            Some(record) if !record.is_usable_at(Utc::now()) => Err(ResolveError::Revoked),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shopfront_store::{names, NewAuthToken, NewUser};

    async fn setup() -> (Store, i64) {
        let store = Store::in_memory().await.unwrap();
        let admin = store.roles().find_by_name("admin").await.unwrap().unwrap();
        let user = store
            .users()
            .create(NewUser {
                name: "Root".to_string(),
                email: "root@example.com".to_string(),
                password_hash: None,
                role_id: Some(admin.id),
            })
            .await
            .unwrap();
        (store, user.id)
    }

    #[tokio::test]
    async fn test_resolve_existing_user() {
        let (store, user_id) = setup().await;
        let resolver = IdentityResolver::new(store);

        let ctx = resolver.resolve(user_id).await.unwrap();
        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.email, "root@example.com");
        assert!(ctx.is_admin());
        assert!(ctx.has_permission(names::VIEW_ANALYTICS));
    }

    #[tokio::test]
    async fn test_resolve_deleted_user() {
        let (store, user_id) = setup().await;
        store.users().delete(user_id).await.unwrap();

        let resolver = IdentityResolver::new(store);
        assert!(matches!(
            resolver.resolve(user_id).await,
            Err(ResolveError::UserNotFound(id)) if id == user_id
        ));
    }

    #[tokio::test]
    async fn test_closed_store_is_a_store_error() {
        let (store, user_id) = setup().await;
        store.close().await;

        let resolver = IdentityResolver::new(store);
        assert!(matches!(
            resolver.resolve(user_id).await,
            Err(ResolveError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_revocation_check() {
        let (store, user_id) = setup().await;
        let resolver = IdentityResolver::new(store.clone());

        // Unknown tokens are not revoked.
        resolver.ensure_not_revoked("never-persisted").await.unwrap();

        store
            .tokens()
            .insert(NewAuthToken {
                user_id,
                token: "persisted".to_string(),
                token_type: "access".to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            })
            .await
            .unwrap();
        resolver.ensure_not_revoked("persisted").await.unwrap();

        store.tokens().revoke("persisted").await.unwrap();
        assert!(matches!(
            resolver.ensure_not_revoked("persisted").await,
            Err(ResolveError::Revoked)
        ));
    }

    #[tokio::test]
    async fn test_expired_record_counts_as_revoked() {
        let (store, user_id) = setup().await;
        store
            .tokens()
            .insert(NewAuthToken {
                user_id,
                token: "stale".to_string(),
                token_type: "access".to_string(),
                expires_at: Utc::now() - Duration::minutes(1),
            })
            .await
            .unwrap();

        let resolver = IdentityResolver::new(store);
        assert!(matches!(
            resolver.ensure_not_revoked("stale").await,
            Err(ResolveError::Revoked)
        ));
    }
}
