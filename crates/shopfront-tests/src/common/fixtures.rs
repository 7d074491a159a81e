// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Constants and request payloads shared by the integration tests.

use serde_json::{json, Value};

/// Signing secret of every [`TestApp`](crate::common::harness::TestApp).
pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// A different secret, for tokens the app must reject.
pub const FOREIGN_SECRET: &str = "some-other-service-secret-also-32-bytes!";

/// Password used by [`register_payload`].
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Role names seeded by the store.
pub mod roles {
    /// Administrator.
    pub const ADMIN: &str = "admin";
    /// Shopper.
    pub const CUSTOMER: &str = "customer";
    /// Seller.
    pub const MERCHANT: &str = "merchant";
}

/// Body for `POST /auth/register` and `POST /users`.
pub fn register_payload(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": TEST_PASSWORD,
    })
}

/// Body for `POST /auth/login`.
pub fn login_payload(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

/// Body for `POST /users/{id}/addresses`.
pub fn address_payload() -> Value {
    json!({
        "address_line1": "1 Market Street",
        "city": "Springfield",
        "state": "IL",
        "zip_code": "62701",
        "country": "US",
        "is_default": true,
    })
}

/// Body for `POST /analytics`.
pub fn event_payload(user_id: Option<i64>, action: &str) -> Value {
    json!({
        "user_id": user_id,
        "action": action,
        "session_id": "session-1",
    })
}

/// Body for `POST /categories`.
pub fn category_payload(name: &str) -> Value {
    json!({ "name": name, "description": format!("All things {}", name) })
}

/// Body for `POST /products`.
pub fn product_payload(sku: &str, price_cents: i64) -> Value {
    json!({
        "name": format!("Product {}", sku),
        "sku": sku,
        "price_cents": price_cents,
        "stock": 25,
    })
}

/// One line of a `POST /orders` body.
pub fn order_line(product_id: i64, quantity: i64) -> Value {
    json!({ "product_id": product_id, "quantity": quantity })
}
