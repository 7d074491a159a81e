// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token authentication middleware.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::auth::{IdentityContext, IdentityResolver, TokenCodec};
use crate::error::ApiError;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer that turns a bearer token into an [`IdentityContext`].
///
/// Applied to the protected router only. Public routes are merged outside it.
#[derive(Clone)]
pub struct AuthLayer {
    codec: TokenCodec,
    resolver: IdentityResolver,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(codec: TokenCodec, resolver: IdentityResolver) -> Self {
        Self { codec, resolver }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            codec: self.codec.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for bearer token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    codec: TokenCodec,
    resolver: IdentityResolver,
}

impl<S> AuthMiddleware<S> {
    async fn authenticate(
        codec: &TokenCodec,
        resolver: &IdentityResolver,
        token: Option<String>,
        client_ip: Option<IpAddr>,
    ) -> Result<IdentityContext, ApiError> {
        let token =
            token.ok_or_else(|| ApiError::unauthorized("No authorization token provided"))?;

        let verified = codec.verify(&token)?;
        resolver.ensure_not_revoked(&token).await?;
        let identity = resolver.resolve(verified.subject_id).await?;

        Ok(identity
            .with_request_id(Uuid::now_v7())
            .with_client_ip(client_ip)
            .with_token(token))
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let codec = self.codec.clone();
        let resolver = self.resolver.clone();
        let mut inner = self.inner.clone();

        // Owned copies: the request body is not `Sync`, so no borrow of `req`
        // may live across an await.
        let token = bearer_token(&req).map(str::to_string);
        let client_ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip());
        let path = req.uri().path().to_string();

        Box::pin(async move {
            match Self::authenticate(&codec, &resolver, token, client_ip).await {
                Ok(identity) => {
                    tracing::debug!(
                        user_id = identity.user_id,
                        role = ?identity.role,
                        request_id = %identity.request_id,
                        "Identity resolved"
                    );
                    req.extensions_mut().insert(identity);
                    inner.call(req).await
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path,
                        error = %e,
                        "Authentication failed"
                    );
                    Ok(e.into_response())
                }
            }
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the bearer token from the Authorization header.
pub fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Tests
// =============================================================================
