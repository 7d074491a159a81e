// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests for `/analytics`.
//!
//! # Test Categories
//!
//! - **Recording**: event creation and validation
//! - **Reading**: admin listing, per-user access
//! - **Deletion**

use shopfront_tests::prelude::*;

// =============================================================================
// Recording
// =============================================================================

#[tokio::test]
async fn test_analytics_record_event() {
    let app = TestApp::spawn().await;
    let (me, token) = app.login_as(roles::CUSTOMER).await;

    let body = app
        .post_json("/analytics", Some(&token), event_payload(Some(me.id), "add_to_cart"))
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(body["message"], "Analytics event recorded");
    assert_eq!(body["event"]["user_id"], me.id);
    assert_eq!(body["event"]["action"], "add_to_cart");
    assert_eq!(body["event"]["session_id"], "session-1");
}

#[tokio::test]
async fn test_analytics_anonymous_event() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::MERCHANT).await;

    let body = app
        .post_json("/analytics", Some(&token), json!({ "action": "page_view" }))
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(body["event"]["user_id"], Value::Null);
}

#[tokio::test]
async fn test_analytics_action_is_required() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;

    app.post_json("/analytics", Some(&token), json!({ "action": "" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Reading
// =============================================================================

#[tokio::test]
async fn test_analytics_admin_lists_events() {
    let app = TestApp::spawn().await;
    let (admin, token) = app.login_as(roles::ADMIN).await;
    for action in ["view", "search", "checkout"] {
        app.post_json("/analytics", Some(&token), event_payload(Some(admin.id), action))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let body = app
        .get("/analytics?per_page=2", Some(&token))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["per_page"], 2);
}

#[tokio::test]
async fn test_analytics_user_reads_own_events() {
    let app = TestApp::spawn().await;
    let (me, token) = app.login_as(roles::CUSTOMER).await;
    app.post_json("/analytics", Some(&token), event_payload(Some(me.id), "view"))
        .await
        .assert_status(StatusCode::CREATED);

    let body = app
        .get(&format!("/analytics/user/{}", me.id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    assert_contains_item(&body, "action", &json!("view"));
}

#[tokio::test]
async fn test_analytics_user_cannot_read_others() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::MERCHANT).await;
    let other = app.create_user(Some(roles::CUSTOMER)).await;

    app.get(&format!("/analytics/user/{}", other.id), Some(&token))
        .await
        .assert_error(StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied");
}

#[tokio::test]
async fn test_analytics_admin_reads_any_user() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::ADMIN).await;
    let other = app.create_user(Some(roles::CUSTOMER)).await;

    let body = app
        .get(&format!("/analytics/user/{}", other.id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analytics_user_route_still_requires_token() {
    let app = TestApp::spawn().await;

    app.get("/analytics/user/1", None)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Deletion
// =============================================================================

#[tokio::test]
async fn test_analytics_delete_event() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::ADMIN).await;
    let body = app
        .post_json("/analytics", Some(&token), event_payload(None, "view"))
        .await
        .assert_status(StatusCode::CREATED);
    let id = body["event"]["id"].as_i64().unwrap();

    let body = app
        .delete(&format!("/analytics/{}", id), Some(&token))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(body["message"], "Analytics event deleted");

    app.delete(&format!("/analytics/{}", id), Some(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analytics_delete_requires_permission() {
    let app = TestApp::spawn().await;
    let (_, token) = app.login_as(roles::CUSTOMER).await;

    app.delete("/analytics/1", Some(&token))
        .await
        .assert_denied("permission");
}
