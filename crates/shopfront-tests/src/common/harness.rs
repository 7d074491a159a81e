// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! [`TestApp`] wires an in-memory store, a token codec and the full router
//! exactly as the server binary does, then drives requests through it with
//! `oneshot`. No socket is bound.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use shopfront_api::auth::password::hash_password;
use shopfront_api::auth::{Claims, JwtConfig, TokenCodec};
use shopfront_api::{ApiConfig, ApiServer, AppState};
use shopfront_store::{NewProduct, NewUser, Product, Store, User};

use super::fixtures::{FOREIGN_SECRET, TEST_PASSWORD, TEST_SECRET};
use super::init_test_logging;

static NEXT_USER: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// TestApp
// =============================================================================

/// The application under test.
pub struct TestApp {
    /// Backing store, for arranging data and checking side effects.
    pub store: Store,
    /// Codec sharing the app's secret.
    pub codec: TokenCodec,
    router: Router,
}

impl TestApp {
    /// Builds an app over a fresh, seeded in-memory database.
    pub async fn spawn() -> Self {
        let store = Store::in_memory().await.expect("in-memory store");
        let config = ApiConfig::default().with_jwt(JwtConfig::new(TEST_SECRET));
        Self::from_parts(config, store)
    }

    /// Builds an app over an already opened store.
    pub fn from_parts(config: ApiConfig, store: Store) -> Self {
        init_test_logging();

        let codec = TokenCodec::new(config.jwt.clone()).expect("codec");

        let state = AppState::builder()
            .config(config)
            .store(store.clone())
            .codec(codec.clone())
            .build()
            .expect("app state");
        let router = ApiServer::new(state).router();

        Self {
            store,
            codec,
            router,
        }
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Sends a request and collects the response.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.dispatch(request).await
    }

    /// Sends a prebuilt request, for custom headers.
    pub async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("response body")
            .to_bytes();

        TestResponse {
            status,
            body: bytes.to_vec(),
        }
    }

    /// `GET uri`.
    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    /// `POST uri` with a JSON body.
    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    /// `PUT uri` with a JSON body.
    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    /// `DELETE uri`.
    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// `DELETE uri` with a JSON body.
    pub async fn delete_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::DELETE, uri, token, Some(body)).await
    }

    // =========================================================================
    // Fixtures
    // =========================================================================

    /// Inserts a user holding `role` (or no role) with [`TEST_PASSWORD`].
    pub async fn create_user(&self, role: Option<&str>) -> User {
        let role_id = match role {
            Some(name) => Some(self.role_id(name).await),
            None => None,
        };
        let n = NEXT_USER.fetch_add(1, Ordering::Relaxed);

        self.store
            .users()
            .create(NewUser {
                name: format!("Test User {}", n),
                email: format!("user{}-{}@example.com", n, role.unwrap_or("none")),
                password_hash: Some(hash_password(TEST_PASSWORD).expect("hash")),
                role_id,
            })
            .await
            .expect("create user")
    }

    /// Creates a user with `role` and issues a token for them.
    pub async fn login_as(&self, role: &str) -> (User, String) {
        let user = self.create_user(Some(role)).await;
        let token = self.token_for(&user, Some(role));
        (user, token)
    }

    /// Issues a valid token for an existing user.
    pub fn token_for(&self, user: &User, role: Option<&str>) -> String {
        self.codec.issue(user.id, role).expect("issue token").token
    }

    /// A correctly signed token that expired an hour ago.
    pub fn expired_token(&self, user_id: i64) -> String {
        let claims = Claims::new(user_id, Some("admin".to_string()), -3600)
            .with_issuer(self.codec.issuer());
        self.codec.encode_claims(&claims).expect("encode claims")
    }

    /// A token for `user_id` signed with a different secret.
    pub fn foreign_token(&self, user_id: i64) -> String {
        let foreign = TokenCodec::new(JwtConfig::new(FOREIGN_SECRET)).expect("codec");
        foreign
            .issue(user_id, Some("admin"))
            .expect("issue token")
            .token
    }

    /// Inserts an uncategorised product with stock.
    pub async fn create_product(&self, sku: &str, price_cents: i64) -> Product {
        self.store
            .products()
            .create(NewProduct {
                name: format!("Product {}", sku),
                price_cents,
                description: None,
                stock: 25,
                sku: sku.to_string(),
                is_featured: false,
                image_url: None,
                category_id: None,
            })
            .await
            .expect("create product")
    }

    /// Looks up a seeded or created role by name.
    pub async fn role_id(&self, name: &str) -> i64 {
        self.store
            .roles()
            .find_by_name(name)
            .await
            .expect("find role")
            .unwrap_or_else(|| panic!("role {} exists", name))
            .id
    }

    /// Looks up a seeded or created permission by name.
    pub async fn permission_id(&self, name: &str) -> i64 {
        self.store
            .permissions()
            .find_by_name(name)
            .await
            .expect("find permission")
            .unwrap_or_else(|| panic!("permission {} exists", name))
            .id
    }
}

// =============================================================================
// TestResponse
// =============================================================================

/// A fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Raw body.
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parses the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({}): {}", e, self.text()))
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
