// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use shopfront_store::names;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{
    analytics, auth, cart, catalog, health, orders, permissions, roles, users, wishlist,
};
use crate::middleware::{AuthLayer, GateLayer};
use crate::state::AppState;

const ADMIN: &str = "admin";
const CUSTOMER: &str = "customer";
const MERCHANT: &str = "merchant";

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(create_cors_layer(&self.config))
            .layer(DefaultBodyLimit::max(self.config.max_body_size));

        public_routes()
            .merge(protected_routes(&self.state))
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until `shutdown_signal` resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal_with_details(format!("Failed to bind {}", addr), e))?;

        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener until `shutdown_signal` resolves.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let router = self.router();
        if let Ok(addr) = listener.local_addr() {
            info!("Starting API server on {}", addr);
        }

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal_with_details("Server error", e))?;

        info!("API server shutdown complete");
        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Routes
// =============================================================================

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/products", get(catalog::list_products))
        .route("/products/{id}", get(catalog::get_product))
}

fn gated(route: MethodRouter<AppState>, gate: GateLayer) -> MethodRouter<AppState> {
    route.layer(gate)
}

/// Routes behind [`AuthLayer`], each with its own gates.
fn protected_routes(state: &AppState) -> Router<AppState> {
    let admin = || GateLayer::any_role([ADMIN]);
    let any_account = || GateLayer::any_role([ADMIN, CUSTOMER, MERCHANT]);
    let admin_with = |permission: &str| GateLayer::role_and_permission([ADMIN], permission);
    let owner_with =
        |permission: &str| GateLayer::role_and_permission([ADMIN, CUSTOMER], permission);
    let seller_with =
        |permission: &str| GateLayer::role_and_permission([ADMIN, MERCHANT], permission);

    Router::new()
        // Auth
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/assign-role/{id}", gated(put(auth::assign_role), admin()))
        // Users
        .route("/users", gated(get(users::list_users), admin_with(names::VIEW_USERS)))
        .route("/users", gated(post(users::create_user), admin_with(names::CREATE_USER)))
        .route("/users/{id}", gated(get(users::get_user), any_account()))
        .route("/users/{id}", gated(put(users::update_user), any_account()))
        .route(
            "/users/{id}",
            gated(delete(users::delete_user), admin_with(names::DELETE_USER)),
        )
        .route(
            "/users/{id}/addresses",
            gated(get(users::list_addresses), owner_with(names::VIEW_ADDRESSES)),
        )
        .route(
            "/users/{id}/addresses",
            gated(post(users::create_address), owner_with(names::CREATE_ADDRESS)),
        )
        .route(
            "/users/{id}/addresses/{address_id}",
            gated(delete(users::delete_address), owner_with(names::DELETE_ADDRESS)),
        )
        // Roles
        .route(
            "/roles",
            gated(get(roles::list_roles).post(roles::create_role), admin()),
        )
        .route(
            "/roles/permissions",
            gated(
                get(roles::list_role_permissions).post(roles::create_role_permission),
                admin(),
            ),
        )
        .route(
            "/roles/{id}",
            gated(put(roles::update_role).delete(roles::delete_role), admin()),
        )
        .route(
            "/roles/{id}/permissions",
            gated(post(roles::assign_permission), admin()),
        )
        .route(
            "/roles/{id}/permissions/{permission_id}",
            gated(delete(roles::revoke_permission), admin()),
        )
        // Permissions
        .route(
            "/permissions",
            gated(
                get(permissions::list_permissions).post(permissions::create_permission),
                admin(),
            ),
        )
        .route("/permissions/assign", gated(post(permissions::assign), admin()))
        .route("/permissions/revoke", gated(delete(permissions::revoke), admin()))
        .route(
            "/permissions/{id}",
            gated(
                put(permissions::update_permission).delete(permissions::delete_permission),
                admin(),
            ),
        )
        // Analytics
        .route(
            "/analytics",
            gated(
                get(analytics::list_events),
                GateLayer::permission(names::VIEW_ANALYTICS),
            ),
        )
        .route(
            "/analytics",
            gated(
                post(analytics::record_event),
                GateLayer::permission(names::CREATE_ANALYTICS_EVENT),
            ),
        )
        .route("/analytics/user/{user_id}", get(analytics::user_events))
        .route(
            "/analytics/{id}",
            gated(
                delete(analytics::delete_event),
                GateLayer::permission(names::DELETE_ANALYTICS_EVENT),
            ),
        )
        // Catalogue
        .route(
            "/categories",
            gated(
                get(catalog::list_categories),
                GateLayer::permission(names::VIEW_CATEGORIES),
            ),
        )
        .route(
            "/categories",
            gated(post(catalog::create_category), admin_with(names::CREATE_CATEGORY)),
        )
        .route(
            "/categories/{id}",
            gated(
                get(catalog::get_category),
                GateLayer::permission(names::VIEW_CATEGORY),
            ),
        )
        .route(
            "/categories/{id}",
            gated(put(catalog::update_category), admin_with(names::UPDATE_CATEGORY)),
        )
        .route(
            "/categories/{id}",
            gated(delete(catalog::delete_category), admin_with(names::DELETE_CATEGORY)),
        )
        .route(
            "/categories/{id}/products",
            gated(
                get(catalog::category_products),
                GateLayer::permission(names::VIEW_CATEGORY),
            ),
        )
        .route(
            "/products",
            gated(post(catalog::create_product), seller_with(names::CREATE_PRODUCT)),
        )
        .route(
            "/products/{id}",
            gated(put(catalog::update_product), seller_with(names::UPDATE_PRODUCT)),
        )
        .route(
            "/products/{id}",
            gated(delete(catalog::delete_product), seller_with(names::DELETE_PRODUCT)),
        )
        // Cart
        .route(
            "/users/{id}/cart",
            gated(get(cart::get_cart), GateLayer::permission(names::VIEW_CART)),
        )
        .route(
            "/users/{id}/cart",
            gated(delete(cart::clear_cart), GateLayer::permission(names::DELETE_CART)),
        )
        .route(
            "/users/{id}/cart/items",
            gated(post(cart::add_item), GateLayer::permission(names::MANAGE_CART)),
        )
        .route(
            "/users/{id}/cart/items/{item_id}",
            gated(
                put(cart::update_item).delete(cart::remove_item),
                GateLayer::permission(names::MANAGE_CART),
            ),
        )
        // Wishlist
        .route(
            "/wishlist",
            gated(
                get(wishlist::list_wishlist),
                GateLayer::permission(names::VIEW_WISHLIST),
            ),
        )
        .route(
            "/wishlist",
            gated(
                post(wishlist::add_to_wishlist),
                GateLayer::permission(names::MANAGE_WISHLIST),
            ),
        )
        .route(
            "/wishlist/{product_id}",
            gated(
                delete(wishlist::remove_from_wishlist),
                GateLayer::permission(names::MANAGE_WISHLIST),
            ),
        )
        // Orders
        .route("/orders", gated(get(orders::list_orders), owner_with(names::VIEW_ORDERS)))
        .route("/orders", gated(post(orders::create_order), owner_with(names::CREATE_ORDER)))
        .route(
            "/orders/{id}",
            gated(get(orders::get_order), owner_with(names::VIEW_ORDERS)),
        )
        .route(
            "/orders/{id}",
            gated(put(orders::update_order), admin_with(names::UPDATE_ORDER)),
        )
        .route(
            "/orders/{id}",
            gated(delete(orders::delete_order), admin_with(names::DELETE_ORDER)),
        )
        .route_layer(AuthLayer::new(
            state.codec().clone(),
            state.resolver().clone(),
        ))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let mut layer = CorsLayer::new()
        .max_age(Duration::from_secs(cors.max_age))
        .allow_methods(methods);

    if cors.allowed_headers.iter().any(|h| h == "*") {
        layer = layer.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = cors
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        layer = layer.allow_headers(headers);
    }

    if cors.allows_any_origin() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(cors.sends_credentials())
    }
}

// =============================================================================
// Tests
// =============================================================================
