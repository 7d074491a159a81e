// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests for `/orders`.
//!
//! # Test Categories
//!
//! - **Placement**: pricing, validation, address ownership
//! - **Reads**: customers see only their own orders
//! - **Administration**: status changes and deletion are admin-only

use shopfront_store::names;
use shopfront_tests::prelude::*;

/// Places an order for the holder of `token` and returns the response body.
async fn place(app: &TestApp, token: &str, items: Vec<Value>) -> Value {
    app.post_json(
        "/orders",
        Some(token),
        json!({ "payment_method": "card", "items": items }),
    )
    .await
    .assert_status(StatusCode::CREATED)
}

// =============================================================================
// Placement
// =============================================================================

#[tokio::test]
async fn test_order_is_priced_from_catalogue() {
    let app = TestApp::spawn().await;
    let (me, token) = app.login_as(roles::CUSTOMER).await;
    let lamp = app.create_product("LAMP-1", 4_500).await;
    let bulb = app.create_product("BULB-1", 300).await;

    let body = place(&app, &token, vec![order_line(lamp.id, 1), order_line(bulb.id, 4)]).await;
    assert_eq!(body["message"], "Order created successfully");

    let order = &body["order"];
    assert_eq!(order["user_id"], me.id);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_cents"], 4_500 + 4 * 300);
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_contains_item(&order["items"], "product_name", &json!("Product BULB-1"));
    assert_contains_item(&order["items"], "unit_price_cents", &json!(4_500));
}

#[tokio::test]
async fn test_order_keeps_prices_after_catalogue_change() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let (_, admin) = app.login_as(roles::ADMIN).await;
    let product = app.create_product("SNAP-1", 1_000).await;

    let body = place(&app, &token, vec![order_line(product.id, 2)]).await;
    let order_id = body["order"]["id"].as_i64().unwrap();

    app.put_json(
        &format!("/products/{}", product.id),
        Some(&admin),
        json!({ "price_cents": 9_999 }),
    )
    .await
    .assert_status(StatusCode::OK);

    let order = app
        .get(&format!("/orders/{}", order_id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(order["total_cents"], 2_000);
    assert_eq!(order["items"][0]["unit_price_cents"], 1_000);
}

#[tokio::test]
async fn test_order_validation() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("VAL-1", 100).await;

    let body = app
        .post_json("/orders", Some(&token), json!({ "items": [] }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    app.post_json(
        "/orders",
        Some(&token),
        json!({ "items": [order_line(product.id, 0)] }),
    )
    .await
    .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    app.post_json(
        "/orders",
        Some(&token),
        json!({ "items": [order_line(5_555, 1)] }),
    )
    .await
    .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Product not found");
}

#[tokio::test]
async fn test_order_with_foreign_address_is_not_found() {
    let app = TestApp::spawn().await;
    let (owner, owner_token) = app.login_as(roles::CUSTOMER).await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("ADDR-1", 100).await;

    let body = app
        .post_json(
            &format!("/users/{}/addresses", owner.id),
            Some(&owner_token),
            address_payload(),
        )
        .await
        .assert_status(StatusCode::CREATED);
    let address_id = body["address"]["id"].as_i64().unwrap();

    app.post_json(
        "/orders",
        Some(&token),
        json!({ "address_id": address_id, "items": [order_line(product.id, 1)] }),
    )
    .await
    .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Address not found");

    let body = app
        .post_json(
            "/orders",
            Some(&owner_token),
            json!({ "addressId": address_id, "items": [order_line(product.id, 1)] }),
        )
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(body["order"]["address_id"], address_id);
}

#[tokio::test]
async fn test_customer_cannot_order_for_someone_else() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let other = app.create_user(Some(roles::CUSTOMER)).await;
    let product = app.create_product("FOR-1", 100).await;

    app.post_json(
        "/orders",
        Some(&token),
        json!({ "user_id": other.id, "items": [order_line(product.id, 1)] }),
    )
    .await
    .assert_error(StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied");

    app.post_json(
        "/orders",
        Some(&token),
        json!({ "user_id": 8_888, "items": [order_line(product.id, 1)] }),
    )
    .await
    .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "User not found");
}

#[tokio::test]
async fn test_admin_may_order_on_behalf_of_customer() {
    let app = TestApp::spawn().await;
    let (_, admin) = app.login_as(roles::ADMIN).await;
    let customer = app.create_user(Some(roles::CUSTOMER)).await;
    let product = app.create_product("BEH-1", 700).await;

    let body = app
        .post_json(
            "/orders",
            Some(&admin),
            json!({ "user_id": customer.id, "items": [order_line(product.id, 1)] }),
        )
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(body["order"]["user_id"], customer.id);
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_customer_lists_only_own_orders() {
    let app = TestApp::spawn().await;
    let (me, token) = app.login_as(roles::CUSTOMER).await;
    let (other, other_token) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("LIST-1", 100).await;

    place(&app, &token, vec![order_line(product.id, 1)]).await;
    place(&app, &other_token, vec![order_line(product.id, 1)]).await;

    let body = app.get("/orders", Some(&token)).await.assert_status(StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["user_id"], me.id);
    assert_eq!(body["meta"]["total"], 1);

    app.get(&format!("/orders?user_id={}", other.id), Some(&token))
        .await
        .assert_error(StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied");
}

#[tokio::test]
async fn test_order_of_another_customer_is_denied() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let (_, other_token) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("PEEK-1", 100).await;

    let body = place(&app, &other_token, vec![order_line(product.id, 1)]).await;
    let order_id = body["order"]["id"].as_i64().unwrap();

    app.get(&format!("/orders/{}", order_id), Some(&token))
        .await
        .assert_error(StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied");
    app.get("/orders/123456", Some(&token))
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Order not found");
}

#[tokio::test]
async fn test_admin_filters_orders_by_status_and_user() {
    let app = TestApp::spawn().await;
    let (_, admin) = app.login_as(roles::ADMIN).await;
    let (buyer, token) = app.login_as(roles::CUSTOMER).await;
    let (_, other_token) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("FILT-1", 100).await;

    let body = place(&app, &token, vec![order_line(product.id, 1)]).await;
    let shipped_id = body["order"]["id"].as_i64().unwrap();
    place(&app, &token, vec![order_line(product.id, 2)]).await;
    place(&app, &other_token, vec![order_line(product.id, 3)]).await;

    app.put_json(
        &format!("/orders/{}", shipped_id),
        Some(&admin),
        json!({ "status": "shipped" }),
    )
    .await
    .assert_status(StatusCode::OK);

    let body = app.get("/orders", Some(&admin)).await.assert_status(StatusCode::OK);
    assert_eq!(body["meta"]["total"], 3);

    let body = app
        .get("/orders?status=shipped", Some(&admin))
        .await
        .assert_status(StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], shipped_id);

    let body = app
        .get(&format!("/orders?userId={}&status=pending", buyer.id), Some(&admin))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);

    app.get("/orders?status=lost", Some(&admin))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    app.get("/orders?start_date=yesterday", Some(&admin))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_merchant_has_no_order_access() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::MERCHANT).await;

    app.get("/orders", Some(&token)).await.assert_denied("role");
    app.post_json("/orders", Some(&token), json!({ "items": [] }))
        .await
        .assert_denied("role");
}

#[tokio::test]
async fn test_customer_without_grant_cannot_place_orders() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let customer = app.role_id(roles::CUSTOMER).await;
    let create = app.permission_id(names::CREATE_ORDER).await;
    app.store.permissions().revoke(customer, create).await.unwrap();

    app.post_json("/orders", Some(&token), json!({ "items": [] }))
        .await
        .assert_denied("permission");
}

// =============================================================================
// Administration
// =============================================================================

#[tokio::test]
async fn test_admin_updates_status() {
    let app = TestApp::spawn().await;
    let (_, admin) = app.login_as(roles::ADMIN).await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("STAT-1", 100).await;
    let body = place(&app, &token, vec![order_line(product.id, 1)]).await;
    let uri = format!("/orders/{}", body["order"]["id"]);

    let body = app
        .put_json(&uri, Some(&admin), json!({ "status": "completed" }))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(body["message"], "Order updated successfully");
    assert_eq!(body["order"]["status"], "completed");

    app.put_json(&uri, Some(&admin), json!({ "status": "teleported" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    app.put_json(&uri, Some(&token), json!({ "status": "cancelled" }))
        .await
        .assert_denied("role");

    app.put_json("/orders/999999", Some(&admin), json!({ "status": "shipped" }))
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Order not found");
}

#[tokio::test]
async fn test_admin_deletes_order() {
    let app = TestApp::spawn().await;
    let (_, admin) = app.login_as(roles::ADMIN).await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("DEL-1", 100).await;
    let body = place(&app, &token, vec![order_line(product.id, 1)]).await;
    let uri = format!("/orders/{}", body["order"]["id"]);

    app.delete(&uri, Some(&token)).await.assert_denied("role");

    let body = app.delete(&uri, Some(&admin)).await.assert_status(StatusCode::OK);
    assert_eq!(body["message"], "Order deleted successfully");
    app.get(&uri, Some(&admin))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
