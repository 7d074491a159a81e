// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests for `/users/{id}/cart` and `/wishlist`.
//!
//! # Test Categories
//!
//! - **Cart**: owner changes, admin oversight, gate denials
//! - **Wishlist**: caller-scoped entries

use shopfront_tests::prelude::*;

fn cart_uri(user_id: i64) -> String {
    format!("/users/{}/cart", user_id)
}

fn items_uri(user_id: i64) -> String {
    format!("/users/{}/cart/items", user_id)
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_lifecycle() {
    let app = TestApp::spawn().await;
    let (me, token) = app.login_as(roles::CUSTOMER).await;
    let mug = app.create_product("MUG-1", 800).await;
    let pen = app.create_product("PEN-1", 150).await;

    app.get(&cart_uri(me.id), Some(&token))
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Cart not found");

    let body = app
        .post_json(
            &items_uri(me.id),
            Some(&token),
            json!({ "product_id": mug.id, "quantity": 2 }),
        )
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(body["message"], "Product added to cart");

    // A second add of the same product merges into one line.
    app.post_json(&items_uri(me.id), Some(&token), json!({ "productId": mug.id }))
        .await
        .assert_status(StatusCode::CREATED);
    let body = app
        .post_json(&items_uri(me.id), Some(&token), json!({ "product_id": pen.id }))
        .await
        .assert_status(StatusCode::CREATED);
    let cart = &body["cart"];
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart["total_cents"], 3 * 800 + 150);

    let line = cart["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|line| line["product_id"] == mug.id)
        .unwrap();
    assert_eq!(line["quantity"], 3);
    let item_id = line["id"].as_i64().unwrap();

    let body = app
        .put_json(
            &format!("{}/{}", items_uri(me.id), item_id),
            Some(&token),
            json!({ "quantity": 1 }),
        )
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(body["cart"]["total_cents"], 800 + 150);

    app.delete(&format!("{}/{}", items_uri(me.id), item_id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    let cart = app
        .get(&cart_uri(me.id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["total_cents"], 150);

    let body = app
        .delete(&cart_uri(me.id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(body["message"], "Cart deleted");
    app.get(&cart_uri(me.id), Some(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_of_another_customer_is_denied() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let other = app.create_user(Some(roles::CUSTOMER)).await;
    let product = app.create_product("OTH-1", 100).await;

    app.get(&cart_uri(other.id), Some(&token))
        .await
        .assert_error(StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied");
    app.post_json(
        &items_uri(other.id),
        Some(&token),
        json!({ "product_id": product.id }),
    )
    .await
    .assert_error(StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied");
    app.delete(&cart_uri(other.id), Some(&token))
        .await
        .assert_error(StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied");
}

#[tokio::test]
async fn test_cart_unknown_user_is_not_found_before_ownership() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;

    app.get(&cart_uri(9999), Some(&token))
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "User not found");
}

#[tokio::test]
async fn test_cart_merchant_is_denied_by_permission() {
    let app = TestApp::spawn().await;
    let (me, token) = app.login_as(roles::MERCHANT).await;

    app.get(&cart_uri(me.id), Some(&token))
        .await
        .assert_denied("permission");
    app.post_json(&items_uri(me.id), Some(&token), json!({ "product_id": 1 }))
        .await
        .assert_denied("permission");
}

#[tokio::test]
async fn test_cart_admin_may_view_and_clear_but_not_fill() {
    let app = TestApp::spawn().await;
    let (customer, customer_token) = app.login_as(roles::CUSTOMER).await;
    let (_, admin_token) = app.login_as(roles::ADMIN).await;
    let product = app.create_product("ADM-1", 500).await;

    app.post_json(
        &items_uri(customer.id),
        Some(&customer_token),
        json!({ "product_id": product.id }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let cart = app
        .get(&cart_uri(customer.id), Some(&admin_token))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(cart["user_id"], customer.id);

    app.post_json(
        &items_uri(customer.id),
        Some(&admin_token),
        json!({ "product_id": product.id }),
    )
    .await
    .assert_error(StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied");

    app.delete(&cart_uri(customer.id), Some(&admin_token))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_cart_rejects_bad_items() {
    let app = TestApp::spawn().await;
    let (me, token) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("BAD-1", 100).await;

    app.post_json(&items_uri(me.id), Some(&token), json!({ "product_id": 4040 }))
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Product not found");

    let body = app
        .post_json(
            &items_uri(me.id),
            Some(&token),
            json!({ "product_id": product.id, "quantity": 0 }),
        )
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    app.put_json(
        &format!("{}/777", items_uri(me.id)),
        Some(&token),
        json!({ "quantity": 2 }),
    )
    .await
    .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Cart item not found");
}

// =============================================================================
// Wishlist
// =============================================================================

#[tokio::test]
async fn test_wishlist_lifecycle() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("WISH-1", 2500).await;

    let body = app
        .post_json("/wishlist", Some(&token), json!({ "product_id": product.id }))
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(body["entry"]["price_cents"], 2500);

    app.post_json("/wishlist", Some(&token), json!({ "productId": product.id }))
        .await
        .assert_error(
            StatusCode::CONFLICT,
            "CONFLICT",
            "Product is already in the wishlist",
        );

    let list = app.get("/wishlist", Some(&token)).await.assert_status(StatusCode::OK);
    assert_contains_item(&list, "product_id", &json!(product.id));

    app.delete(&format!("/wishlist/{}", product.id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    let list = app.get("/wishlist", Some(&token)).await.assert_status(StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());

    app.delete(&format!("/wishlist/{}", product.id), Some(&token))
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Wishlist item not found");
}

#[tokio::test]
async fn test_wishlist_is_scoped_to_caller() {
    let app = TestApp::spawn().await;
    let (_, first) = app.login_as(roles::CUSTOMER).await;
    let (_, second) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("SCOPE-1", 100).await;

    app.post_json("/wishlist", Some(&first), json!({ "product_id": product.id }))
        .await
        .assert_status(StatusCode::CREATED);

    let list = app.get("/wishlist", Some(&second)).await.assert_status(StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_wishlist_unknown_product_and_merchant_denial() {
    let app = TestApp::spawn().await;
    let (_, customer) = app.login_as(roles::CUSTOMER).await;
    let (_, merchant) = app.login_as(roles::MERCHANT).await;

    app.post_json("/wishlist", Some(&customer), json!({ "product_id": 31337 }))
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Product not found");
    app.get("/wishlist", Some(&merchant))
        .await
        .assert_denied("permission");
}
