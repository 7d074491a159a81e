// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `assign-role` command.

use shopfront_config::ShopfrontConfig;
use shopfront_store::Store;
use tracing::info;

use crate::cli::AssignRoleArgs;
use crate::error::{BinError, BinResult};

/// Sets the role of the user registered under `args.email`.
pub async fn assign_role(config: ShopfrontConfig, args: AssignRoleArgs) -> BinResult<()> {
    let store = Store::connect(&config.store_config()).await?;
    let outcome = apply(&store, &args).await;
    store.close().await;

    let user_id = outcome?;
    println!("✓ User {} ({}) now has role '{}'", user_id, args.email, args.role);
    Ok(())
}

async fn apply(store: &Store, args: &AssignRoleArgs) -> BinResult<i64> {
    let user = store
        .users()
        .find_by_email(&args.email)
        .await?
        .ok_or_else(|| BinError::not_found(format!("no user with email '{}'", args.email)))?;
    let role = store
        .roles()
        .find_by_name(&args.role)
        .await?
        .ok_or_else(|| BinError::not_found(format!("no role named '{}'", args.role)))?;

    store.users().set_role(user.id, Some(role.id)).await?;
    info!(user_id = user.id, role = %role.name, "Role assigned");
    Ok(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_store::NewUser;

    async fn store_with_user() -> Store {
        let store = Store::in_memory().await.unwrap();
        store
            .users()
            .create(NewUser {
                name: "Root".to_string(),
                email: "root@example.com".to_string(),
                password_hash: None,
                role_id: None,
            })
            .await
            .unwrap();
        store
    }

    fn args(email: &str, role: &str) -> AssignRoleArgs {
        AssignRoleArgs {
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_assigns_role() {
        let store = store_with_user().await;
        let user_id = apply(&store, &args("root@example.com", "admin")).await.unwrap();

        let identity = store.identities().load(user_id).await.unwrap().unwrap();
        assert_eq!(identity.role.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_unknown_user_or_role() {
        let store = store_with_user().await;

        let err = apply(&store, &args("nobody@example.com", "admin")).await.unwrap_err();
        assert_eq!(err.exit_code(), 7);

        let err = apply(&store, &args("root@example.com", "superuser")).await.unwrap_err();
        assert!(err.to_string().contains("superuser"));
    }
}
