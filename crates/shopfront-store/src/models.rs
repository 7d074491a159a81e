// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Row types and write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// =============================================================================
// Roles & Permissions
// =============================================================================

/// A named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An atomic named capability.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A role together with the permissions reachable through `role_permissions`.
#[derive(Debug, Clone, Serialize)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// A row of the role/permission join table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RolePermission {
    pub id: i64,
    pub role_id: i64,
    pub permission_id: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Users
// =============================================================================

/// A registered account.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role_id: Option<i64>,
    pub phone_number: Option<String>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role_id: Option<i64>,
}

/// Partial update of a user profile. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone_number: Option<String>,
}

/// Resolved identity: user, role name and flattened permission names.
///
/// Produced by a single join over `users`, `roles`, `role_permissions` and
/// `permissions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub permissions: Vec<String>,
}

// =============================================================================
// Auth tokens
// =============================================================================

/// Persisted record of an issued token, used for revocation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuthToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub is_revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    /// Returns `true` if this record may still authorize a request at `now`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && self.expires_at > now
    }
}

/// Payload for recording an issued token.
#[derive(Debug, Clone)]
pub struct NewAuthToken {
    pub user_id: i64,
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// Addresses
// =============================================================================

/// A postal address owned by a user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting an address.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

// =============================================================================
// Analytics
// =============================================================================

/// A recorded analytics event.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnalyticsEvent {
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub product_id: Option<i64>,
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Payload for recording an analytics event.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAnalyticsEvent {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub action: String,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub session_id: Option<String>,
}

// =============================================================================
// Catalogue
// =============================================================================

/// A product grouping.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for inserting a category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update of a category. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A sellable item. Prices are whole cents.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub description: Option<String>,
    pub stock: i64,
    pub sku: String,
    pub is_featured: bool,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for inserting a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(alias = "priceCents")]
    pub price_cents: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stock: i64,
    pub sku: String,
    #[serde(default, alias = "isFeatured")]
    pub is_featured: bool,
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default, alias = "categoryId")]
    pub category_id: Option<i64>,
}

/// Partial update of a product. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "priceCents")]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, alias = "isFeatured")]
    pub is_featured: Option<bool>,
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default, alias = "categoryId")]
    pub category_id: Option<i64>,
}

// =============================================================================
// Cart & wishlist
// =============================================================================

/// A cart item joined with the product it holds.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct CartLine {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl CartLine {
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// A user's cart with its items priced at current catalogue prices.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub items: Vec<CartLine>,
    pub total_cents: i64,
}

impl Cart {
    pub(crate) fn new(id: i64, user_id: i64, items: Vec<CartLine>) -> Self {
        let total_cents = items.iter().map(CartLine::subtotal_cents).sum();
        Self {
            id,
            user_id,
            items,
            total_cents,
        }
    }
}

/// A wishlist entry joined with its product.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct WishlistEntry {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Orders
// =============================================================================

/// Fulfilment state of an order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order header.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub address_id: Option<i64>,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order line, priced when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    /// `None` once the product has been removed from the catalogue.
    pub product_id: Option<i64>,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// An order with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// One requested line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OrderLine {
    #[serde(alias = "productId")]
    pub product_id: i64,
    pub quantity: i64,
}

/// Payload for placing an order. Prices are read from the catalogue.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub address_id: Option<i64>,
    pub payment_method: Option<String>,
    pub lines: Vec<OrderLine>,
}

/// Conjunctive filter for order listings. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub user_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(expires_at: DateTime<Utc>, is_revoked: bool) -> AuthToken {
        AuthToken {
            id: 1,
            user_id: 1,
            token: "t".to_string(),
            token_type: "access".to_string(),
            expires_at,
            is_revoked,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_auth_token_usable() {
        let now = Utc::now();
        assert!(token(now + Duration::hours(1), false).is_usable_at(now));
        assert!(!token(now + Duration::hours(1), true).is_usable_at(now));
        assert!(!token(now - Duration::seconds(1), false).is_usable_at(now));
    }

    #[test]
    fn test_user_serialization_hides_password() {
        let user = User {
            id: 7,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: Some("secret-hash".to_string()),
            role_id: None,
            phone_number: None,
            is_verified: false,
            verified_at: None,
            profile_picture: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("ana@example.com"));
    }

    #[test]
    fn test_order_status_names() {
        assert_eq!(OrderStatus::parse("shipped"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::parse("Shipped"), None);
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(
            serde_json::to_value(OrderStatus::Cancelled).unwrap(),
            serde_json::json!("cancelled")
        );
    }

    #[test]
    fn test_cart_total_sums_lines() {
        let line = |id, price, quantity| CartLine {
            id,
            product_id: id,
            product_name: format!("p{}", id),
            unit_price_cents: price,
            quantity,
        };
        let cart = Cart::new(1, 9, vec![line(1, 250, 2), line(2, 1000, 1)]);
        assert_eq!(cart.total_cents, 1500);
        assert_eq!(Cart::new(2, 9, Vec::new()).total_cents, 0);
    }
}
