// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request extractors that reject with [`ApiError`] instead of axum's
//! plain-text rejections, so every failure carries the JSON error body.

use std::net::IpAddr;

use axum::{
    body::Body,
    extract::{FromRequest, FromRequestParts, Path, Query},
    http::{request::Parts, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use shopfront_store::Page;

use crate::auth::IdentityContext;
use crate::error::ApiError;

/// Largest page a list endpoint serves.
pub const MAX_PER_PAGE: u32 = 100;

const DEFAULT_PER_PAGE: u32 = 50;

// =============================================================================
// Identity
// =============================================================================

/// The caller, as resolved by [`AuthLayer`](crate::middleware::AuthLayer).
///
/// Only handlers mounted under the auth layer see a context; anywhere else
/// this rejects with 401.
pub struct Identity(pub IdentityContext);

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<IdentityContext>() {
            Some(identity) => Ok(Identity(identity.clone())),
            None => Err(ApiError::unauthorized("Authentication required")),
        }
    }
}

// =============================================================================
// Body and path
// =============================================================================

/// JSON request body. Malformed JSON, a missing content type or a field of
/// the wrong type is a 400; semantic checks happen in the handler.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(body)| ValidatedJson(body))
            .map_err(|rejection| {
                ApiError::bad_request(format!("Invalid JSON: {}", rejection.body_text()))
            })
    }
}

/// Path segments, usually numeric record ids.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(segments)| ApiPath(segments))
            .map_err(|rejection| {
                ApiError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
            })
    }
}

/// Query-string filters.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(query)| ApiQuery(query))
            .map_err(|rejection| {
                ApiError::bad_request(format!("Invalid query parameter: {}", rejection.body_text()))
            })
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// `?page=&per_page=` on list endpoints. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginationParams {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationParams {
    pub fn limit(&self) -> u32 {
        self.per_page.min(MAX_PER_PAGE)
    }

    /// Rows skipped before this page.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.limit())
    }

    /// The store window for this page.
    pub fn page(&self) -> Page {
        Page::new(self.limit(), self.offset())
    }

    fn check(self) -> Result<Self, ApiError> {
        if self.page < 1 {
            return Err(ApiError::validation("page must be greater than 0"));
        }
        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            return Err(ApiError::validation(format!(
                "per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        Ok(self)
    }
}

/// Checked [`PaginationParams`].
pub struct Pagination(pub PaginationParams);

impl<S: Send + Sync> FromRequestParts<S> for Pagination {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::bad_request(format!(
                    "Invalid pagination parameters: {}",
                    rejection.body_text()
                ))
            })?;
        params.check().map(Pagination)
    }
}

// =============================================================================
// Client address
// =============================================================================

/// Best guess at the caller's address, for audit logging of logins.
///
/// Proxy headers win over the socket address; `None` when neither is
/// available (requests driven through `oneshot` in tests).
pub struct ClientIp(pub Option<IpAddr>);

fn header_ip(parts: &Parts, name: &str) -> Option<IpAddr> {
    let value = parts.headers.get(name)?.to_str().ok()?;
    // X-Forwarded-For lists the original client first.
    value.split(',').next()?.trim().parse().ok()
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = header_ip(parts, "x-forwarded-for")
            .or_else(|| header_ip(parts, "x-real-ip"))
            .or_else(|| {
                parts
                    .extensions
                    .get::<IdentityContext>()
                    .and_then(|identity| identity.client_ip)
            });
        Ok(ClientIp(ip))
    }
}
