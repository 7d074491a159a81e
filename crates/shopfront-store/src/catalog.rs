// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Default roles and permissions.
//!
//! Roles and permissions are ordinary rows managed by administrators at
//! runtime. This module only describes the catalogue inserted into a fresh
//! database so that every gated route has a role able to pass it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

// =============================================================================
// Permission names
// =============================================================================

/// Permission names referenced by the HTTP routes.
pub mod names {
    pub const VIEW_USERS: &str = "view_users";
    pub const CREATE_USER: &str = "create_user";
    pub const DELETE_USER: &str = "delete_user";

    pub const VIEW_ADDRESSES: &str = "view_addresses";
    pub const CREATE_ADDRESS: &str = "create_address";
    pub const DELETE_ADDRESS: &str = "delete_address";

    pub const VIEW_ANALYTICS: &str = "view_analytics";
    pub const CREATE_ANALYTICS_EVENT: &str = "create_analytics_event";
    pub const DELETE_ANALYTICS_EVENT: &str = "delete_analytics_event";

    pub const VIEW_CATEGORIES: &str = "view_categories";
    pub const VIEW_CATEGORY: &str = "view_category";
    pub const CREATE_CATEGORY: &str = "create_category";
    pub const UPDATE_CATEGORY: &str = "update_category";
    pub const DELETE_CATEGORY: &str = "delete_category";

    pub const CREATE_PRODUCT: &str = "create_product";
    pub const UPDATE_PRODUCT: &str = "update_product";
    pub const DELETE_PRODUCT: &str = "delete_product";

    pub const VIEW_CART: &str = "view_cart";
    pub const MANAGE_CART: &str = "manage_cart";
    pub const DELETE_CART: &str = "delete_cart";

    pub const VIEW_WISHLIST: &str = "view_wishlist";
    pub const MANAGE_WISHLIST: &str = "manage_wishlist";

    pub const VIEW_ORDERS: &str = "view_orders";
    pub const CREATE_ORDER: &str = "create_order";
    pub const UPDATE_ORDER: &str = "update_order";
    pub const DELETE_ORDER: &str = "delete_order";

    /// Every permission the default catalogue seeds, with its description.
    pub const ALL: &[(&str, &str)] = &[
        (VIEW_USERS, "List and read user accounts"),
        (CREATE_USER, "Create user accounts"),
        (DELETE_USER, "Delete user accounts"),
        (VIEW_ADDRESSES, "Read user addresses"),
        (CREATE_ADDRESS, "Add user addresses"),
        (DELETE_ADDRESS, "Remove user addresses"),
        (VIEW_ANALYTICS, "Read analytics events"),
        (CREATE_ANALYTICS_EVENT, "Record analytics events"),
        (DELETE_ANALYTICS_EVENT, "Delete analytics events"),
        (VIEW_CATEGORIES, "List categories"),
        (VIEW_CATEGORY, "Read a category and its products"),
        (CREATE_CATEGORY, "Create categories"),
        (UPDATE_CATEGORY, "Edit categories"),
        (DELETE_CATEGORY, "Delete categories"),
        (CREATE_PRODUCT, "Add products to the catalogue"),
        (UPDATE_PRODUCT, "Edit products"),
        (DELETE_PRODUCT, "Remove products from the catalogue"),
        (VIEW_CART, "Read a cart"),
        (MANAGE_CART, "Add, change and remove cart items"),
        (DELETE_CART, "Empty a cart"),
        (VIEW_WISHLIST, "Read one's wishlist"),
        (MANAGE_WISHLIST, "Add and remove wishlist products"),
        (VIEW_ORDERS, "List and read orders"),
        (CREATE_ORDER, "Place orders"),
        (UPDATE_ORDER, "Change order status"),
        (DELETE_ORDER, "Delete orders"),
    ];
}

// =============================================================================
// DefaultRole
// =============================================================================

/// Roles present in every freshly seeded database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultRole {
    /// Full administrative access.
    Admin,
    /// Shopper account; the role given at self-registration.
    Customer,
    /// Seller account.
    Merchant,
}

impl DefaultRole {
    /// All default roles.
    pub const ALL: [DefaultRole; 3] = [DefaultRole::Admin, DefaultRole::Customer, DefaultRole::Merchant];

    /// Returns the role name as stored in `roles.name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultRole::Admin => "admin",
            DefaultRole::Customer => "customer",
            DefaultRole::Merchant => "merchant",
        }
    }

    /// Parses a default role name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(DefaultRole::Admin),
            "customer" => Some(DefaultRole::Customer),
            "merchant" => Some(DefaultRole::Merchant),
            _ => None,
        }
    }

    /// Permission names granted to this role when seeded.
    pub fn default_permissions(&self) -> Vec<&'static str> {
        match self {
            DefaultRole::Admin => names::ALL.iter().map(|(name, _)| *name).collect(),
            DefaultRole::Customer => vec![
                names::VIEW_ADDRESSES,
                names::CREATE_ADDRESS,
                names::DELETE_ADDRESS,
                names::CREATE_ANALYTICS_EVENT,
                names::VIEW_CATEGORIES,
                names::VIEW_CATEGORY,
                names::VIEW_CART,
                names::MANAGE_CART,
                names::DELETE_CART,
                names::VIEW_WISHLIST,
                names::MANAGE_WISHLIST,
                names::VIEW_ORDERS,
                names::CREATE_ORDER,
            ],
            DefaultRole::Merchant => vec![
                names::CREATE_ANALYTICS_EVENT,
                names::VIEW_CATEGORIES,
                names::VIEW_CATEGORY,
                names::CREATE_PRODUCT,
                names::UPDATE_PRODUCT,
                names::DELETE_PRODUCT,
            ],
        }
    }

    fn description(&self) -> &'static str {
        match self {
            DefaultRole::Admin => "Administrator with access to every resource",
            DefaultRole::Customer => "Shopper account",
            DefaultRole::Merchant => "Seller account",
        }
    }
}

impl std::fmt::Display for DefaultRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Seeding
// =============================================================================

/// Rows inserted by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: u64,
    pub permissions_created: u64,
    pub grants_created: u64,
}

/// Inserts missing default roles, permissions and grants in one transaction.
///
/// Existing rows are left alone, so grants an administrator has revoked from a
/// default role are restored only if the grant row is missing.
pub(crate) async fn seed(pool: &SqlitePool) -> StoreResult<SeedReport> {
    let now = Utc::now();
    let mut report = SeedReport::default();
    let mut tx = pool.begin().await?;

    for &(name, description) in names::ALL {
        report.permissions_created += sqlx::query(
            "INSERT OR IGNORE INTO permissions (name, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    for role in DefaultRole::ALL {
        report.roles_created += sqlx::query(
            "INSERT OR IGNORE INTO roles (name, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(role.as_str())
        .bind(role.description())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        for permission in role.default_permissions() {
            report.grants_created += sqlx::query(
                "INSERT OR IGNORE INTO role_permissions (role_id, permission_id, created_at) \
                 SELECT r.id, p.id, ? FROM roles r, permissions p \
                 WHERE r.name = ? AND p.name = ?",
            )
            .bind(now)
            .bind(role.as_str())
            .bind(permission)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
    }

    tx.commit().await?;

    if report != SeedReport::default() {
        info!(
            roles = report.roles_created,
            permissions = report.permissions_created,
            grants = report.grants_created,
            "Seeded default roles and permissions"
        );
    }
    Ok(report)
}
