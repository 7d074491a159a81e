// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JSON bodies shared by several handlers.
//!
//! Entity payloads (users, roles, events) serialize straight from the store
//! types; only envelopes and auth/health bodies live here.

use serde::{Deserialize, Serialize};

use crate::extractors::PaginationParams;

/// Scheme announced in [`AuthResponse::token_type`] and expected in the
/// `Authorization` header.
pub const TOKEN_TYPE: &str = "Bearer";

/// `{"message": ...}` for operations with nothing else to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Lists
// =============================================================================

/// One page of a list endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: ResponseMeta,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, meta: ResponseMeta) -> Self {
        Self { data, meta }
    }
}

/// Where a page sits in the full list.
///
/// `total` and `total_pages` are omitted for lists that are not counted,
/// such as the analytics log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl ResponseMeta {
    /// Metadata for an uncounted page.
    pub fn window(params: &PaginationParams) -> Self {
        Self {
            page: params.page,
            per_page: params.limit(),
            ..Default::default()
        }
    }

    /// Metadata for a page of a list holding `total` rows.
    pub fn counted(params: &PaginationParams, total: i64) -> Self {
        let total = u64::try_from(total).unwrap_or_default();
        let per_page = u64::from(params.limit().max(1));
        let total_pages = u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX);

        Self {
            total: Some(total),
            total_pages: Some(total_pages),
            ..Self::window(params)
        }
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

impl AuthResponse {
    pub fn bearer(token: String, expires_in: i64) -> Self {
        Self {
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in,
        }
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// Body of `/ready`; `ready` is false as soon as one dependency is down.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub components: Vec<ComponentStatus>,
}

impl ReadinessResponse {
    pub fn from_components(components: Vec<ComponentStatus>) -> Self {
        Self {
            ready: components.iter().all(|c| c.healthy),
            components,
        }
    }
}

/// A dependency checked by `/ready`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub name: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    pub fn up(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: true,
            message: None,
        }
    }

    pub fn down(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: false,
            message: Some(message.into()),
        }
    }
}
