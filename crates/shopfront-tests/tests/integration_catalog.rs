// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests for `/categories` and `/products`.
//!
//! # Test Categories
//!
//! - **Categories**: permission-gated reads, admin-only writes
//! - **Products**: public reads, admin and merchant writes

use shopfront_store::names;
use shopfront_tests::prelude::*;

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_categories_admin_lifecycle() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::ADMIN).await;

    let body = app
        .post_json("/categories", Some(&token), category_payload("books"))
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(body["message"], "Category created successfully");
    let id = body["category"]["id"].as_i64().unwrap();

    let body = app
        .put_json(
            &format!("/categories/{}", id),
            Some(&token),
            json!({ "name": "novels" }),
        )
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(body["category"]["name"], "novels");
    assert_eq!(body["category"]["description"], "All things books");

    let list = app.get("/categories", Some(&token)).await.assert_status(StatusCode::OK);
    assert_contains_item(&list, "name", &json!("novels"));

    app.delete(&format!("/categories/{}", id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    app.get(&format!("/categories/{}", id), Some(&token))
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Category not found");
}

#[tokio::test]
async fn test_categories_duplicate_name_conflicts() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::ADMIN).await;
    app.post_json("/categories", Some(&token), category_payload("toys"))
        .await
        .assert_status(StatusCode::CREATED);

    app.post_json("/categories", Some(&token), category_payload("toys"))
        .await
        .assert_error(StatusCode::CONFLICT, "CONFLICT", "Category already exists");
}

#[tokio::test]
async fn test_categories_readable_by_customers_and_merchants() {
    let app = TestApp::spawn().await;
    let (_, admin) = app.login_as(roles::ADMIN).await;
    let body = app
        .post_json("/categories", Some(&admin), category_payload("garden"))
        .await
        .assert_status(StatusCode::CREATED);
    let id = body["category"]["id"].as_i64().unwrap();

    for role in [roles::CUSTOMER, roles::MERCHANT] {
        let (_, token) = app.login_as(role).await;
        app.get("/categories", Some(&token)).await.assert_status(StatusCode::OK);
        app.get(&format!("/categories/{}/products", id), Some(&token))
            .await
            .assert_status(StatusCode::OK);
    }
}

#[tokio::test]
async fn test_categories_writes_are_admin_only() {
    let app = TestApp::spawn().await;
    let (_, merchant) = app.login_as(roles::MERCHANT).await;
    let (_, customer) = app.login_as(roles::CUSTOMER).await;

    for token in [&merchant, &customer] {
        app.post_json("/categories", Some(token), category_payload("denied"))
            .await
            .assert_denied("role");
    }
    app.get("/categories", None)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_categories_read_follows_live_revocation() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let customer = app.role_id(roles::CUSTOMER).await;
    let view = app.permission_id(names::VIEW_CATEGORIES).await;

    app.store.permissions().revoke(customer, view).await.unwrap();

    app.get("/categories", Some(&token)).await.assert_denied("permission");
}

#[tokio::test]
async fn test_category_products_lists_members() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::ADMIN).await;
    let body = app
        .post_json("/categories", Some(&token), category_payload("kitchen"))
        .await
        .assert_status(StatusCode::CREATED);
    let category_id = body["category"]["id"].as_i64().unwrap();

    let mut payload = product_payload("KIT-1", 1200);
    payload["category_id"] = json!(category_id);
    app.post_json("/products", Some(&token), payload)
        .await
        .assert_status(StatusCode::CREATED);
    app.create_product("LOOSE-1", 100).await;

    let products = app
        .get(&format!("/categories/{}/products", category_id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(products.as_array().unwrap().len(), 1);
    assert_contains_item(&products, "sku", &json!("KIT-1"));

    app.get("/categories/999/products", Some(&token))
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Category not found");
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_products_are_public() {
    let app = TestApp::spawn().await;
    let product = app.create_product("PUB-1", 999).await;

    let body = app.get("/products", None).await.assert_status(StatusCode::OK);
    assert_contains_item(&body["data"], "sku", &json!("PUB-1"));
    assert_eq!(body["meta"]["total"], 1);

    let body = app
        .get(&format!("/products/{}", product.id), None)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(body["price_cents"], 999);

    app.get("/products/404", None)
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Product not found");
}

#[tokio::test]
async fn test_products_merchant_manages_catalogue() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::MERCHANT).await;

    let body = app
        .post_json("/products", Some(&token), product_payload("MER-1", 500))
        .await
        .assert_status(StatusCode::CREATED);
    let id = body["product"]["id"].as_i64().unwrap();
    assert_eq!(body["product"]["stock"], 25);

    let body = app
        .put_json(
            &format!("/products/{}", id),
            Some(&token),
            json!({ "price_cents": 450, "isFeatured": true }),
        )
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(body["product"]["price_cents"], 450);
    assert_eq!(body["product"]["is_featured"], true);
    assert_eq!(body["product"]["sku"], "MER-1");

    app.delete(&format!("/products/{}", id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    app.get(&format!("/products/{}", id), None)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_products_customer_cannot_write() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;
    let product = app.create_product("CUS-1", 100).await;

    app.post_json("/products", Some(&token), product_payload("CUS-2", 100))
        .await
        .assert_denied("role");
    app.delete(&format!("/products/{}", product.id), Some(&token))
        .await
        .assert_denied("role");
    app.post_json("/products", None, product_payload("CUS-3", 100))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_products_merchant_without_grant_is_denied() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::MERCHANT).await;
    let merchant = app.role_id(roles::MERCHANT).await;
    let create = app.permission_id(names::CREATE_PRODUCT).await;
    app.store.permissions().revoke(merchant, create).await.unwrap();

    app.post_json("/products", Some(&token), product_payload("REV-1", 100))
        .await
        .assert_denied("permission");
}

#[tokio::test]
async fn test_products_validation_and_conflicts() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::ADMIN).await;
    app.create_product("DUP-1", 100).await;

    let body = app
        .post_json(
            "/products",
            Some(&token),
            json!({ "name": "", "sku": "NEG-1", "price_cents": -5 }),
        )
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    app.post_json("/products", Some(&token), product_payload("DUP-1", 100))
        .await
        .assert_error(StatusCode::CONFLICT, "CONFLICT", "SKU is already in use");

    let mut payload = product_payload("CAT-1", 100);
    payload["category_id"] = json!(4242);
    app.post_json("/products", Some(&token), payload)
        .await
        .assert_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Category not found");
}
