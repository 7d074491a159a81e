// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-route authorization middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{GateError, IdentityContext, RouteGuard};
use crate::error::ApiError;

// =============================================================================
// GateLayer
// =============================================================================

/// Layer enforcing a [`RouteGuard`] against the identity attached by
/// [`AuthLayer`](super::AuthLayer).
#[derive(Clone)]
pub struct GateLayer {
    guard: Arc<RouteGuard>,
}

impl GateLayer {
    /// Creates a layer enforcing `guard`.
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard: Arc::new(guard),
        }
    }

    /// Requires the identity's role to be one of `roles`.
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(RouteGuard::new().require_any_role(roles))
    }

    /// Requires the named permission.
    pub fn permission(name: impl Into<String>) -> Self {
        Self::new(RouteGuard::new().require_permission(name))
    }

    /// Requires one of `roles` and then the named permission.
    pub fn role_and_permission<I, S>(roles: I, permission: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            RouteGuard::new()
                .require_any_role(roles)
                .require_permission(permission),
        )
    }
}

impl<S> Layer<S> for GateLayer {
    type Service = GateMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateMiddleware {
            inner,
            guard: self.guard.clone(),
        }
    }
}

// =============================================================================
// GateMiddleware
// =============================================================================

/// Middleware for gate enforcement.
#[derive(Clone)]
pub struct GateMiddleware<S> {
    inner: S,
    guard: Arc<RouteGuard>,
}

impl<S> Service<Request<Body>> for GateMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let identity = req.extensions().get::<IdentityContext>();

        if let Err(e) = self.guard.check(identity) {
            match (&e, identity) {
                (GateError::Forbidden { reason, required }, Some(ctx)) => tracing::warn!(
                    user_id = ctx.user_id,
                    role = ?ctx.role,
                    reason = %reason,
                    required = %required,
                    "Access denied"
                ),
                _ => tracing::warn!("No identity attached, denying access"),
            }
            let response = ApiError::from(e).into_response();
            return Box::pin(async move { Ok(response) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use shopfront_store::IdentityRecord;
    use std::convert::Infallible;
    use tower::ServiceExt;

    async fn ok(_req: Request<Body>) -> Result<Response, Infallible> {
        Ok(Response::new(Body::from("handled")))
    }

    fn request_as(role: Option<&str>, permissions: &[&str]) -> Request<Body> {
        let mut req = Request::builder().uri("/x").body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(IdentityContext::from_record(IdentityRecord {
                user_id: 7,
                name: "T".to_string(),
                email: "t@example.com".to_string(),
                role: role.map(str::to_string),
                permissions: permissions.iter().map(|p| p.to_string()).collect(),
            }));
        req
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_passing_gate_reaches_handler() {
        let service = GateLayer::permission("view_analytics").layer(tower::service_fn(ok));
        let response = service
            .oneshot(request_as(Some("admin"), &["view_analytics"]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_permission() {
        let service = GateLayer::permission("view_analytics").layer(tower::service_fn(ok));
        let response = service.oneshot(request_as(Some("admin"), &[])).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json(response).await["reason"], "permission");
    }

    #[tokio::test]
    async fn test_role_denial_precedes_permission() {
        let service = GateLayer::role_and_permission(["admin"], "view_users")
            .layer(tower::service_fn(ok));
        let response = service.oneshot(request_as(Some("customer"), &[])).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json(response).await["reason"], "role");
    }

    #[tokio::test]
    async fn test_no_identity_fails_closed() {
        let service = GateLayer::any_role(["admin"]).layer(tower::service_fn(ok));
        let req = Request::builder().uri("/x").body(Body::empty()).unwrap();
        let response = service.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
