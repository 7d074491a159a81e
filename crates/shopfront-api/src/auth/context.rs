// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request identity.

use std::net::IpAddr;
use std::sync::Arc;

use serde::Serialize;
use shopfront_store::{DefaultRole, IdentityRecord};
use uuid::Uuid;

use super::permission::PermissionSet;

/// Identity resolved for one request.
///
/// Built fresh from the store on every request and attached to the request
/// extensions by the auth middleware. Never cached across requests.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityContext {
    /// User ID.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Role name, absent when the user has no role.
    pub role: Option<String>,
    /// Permissions granted through the role.
    pub permissions: Arc<PermissionSet>,
    /// Request ID for tracing.
    #[serde(skip)]
    pub request_id: Uuid,
    /// Client IP address.
    #[serde(skip)]
    pub client_ip: Option<IpAddr>,
    /// The bearer token the request presented.
    #[serde(skip)]
    pub token: Option<Arc<str>>,
}

impl IdentityContext {
    /// Creates a context from a resolved identity record.
    pub fn from_record(record: IdentityRecord) -> Self {
        Self {
            user_id: record.user_id,
            name: record.name,
            email: record.email,
            role: record.role,
            permissions: Arc::new(PermissionSet::from_names(record.permissions)),
            request_id: Uuid::now_v7(),
            client_ip: None,
            token: None,
        }
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.client_ip = ip;
        self
    }

    /// Records the presented bearer token.
    pub fn with_token(mut self, token: impl Into<Arc<str>>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns `true` if the context has the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }

    /// Returns `true` if the context's role is one of `roles`.
    ///
    /// A context without a role matches nothing.
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }

    /// Returns `true` if the context has the given permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Returns `true` for the administrator role.
    pub fn is_admin(&self) -> bool {
        self.has_role(DefaultRole::Admin.as_str())
    }

    /// Returns `true` if this identity may act on resources owned by
    /// `user_id` as a customer: only its own.
    pub fn customer_may_access(&self, user_id: i64) -> bool {
        !self.has_role(DefaultRole::Customer.as_str()) || self.user_id == user_id
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: Option<&str>, permissions: &[&str]) -> IdentityRecord {
        IdentityRecord {
            user_id: 5,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: role.map(str::to_string),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_context_from_record() {
        let ctx = IdentityContext::from_record(record(Some("admin"), &["view_users"]));

        assert_eq!(ctx.user_id, 5);
        assert!(ctx.is_admin());
        assert!(ctx.has_any_role(&["customer", "admin"]));
        assert!(ctx.has_permission("view_users"));
        assert!(!ctx.has_permission("delete_user"));
    }

    #[test]
    fn test_context_without_role() {
        let ctx = IdentityContext::from_record(record(None, &[]));

        assert!(!ctx.is_admin());
        assert!(!ctx.has_any_role(&["admin", "customer", "merchant"]));
        assert!(ctx.permissions.is_empty());
    }

    #[test]
    fn test_customer_self_access() {
        let customer = IdentityContext::from_record(record(Some("customer"), &[]));
        assert!(customer.customer_may_access(5));
        assert!(!customer.customer_may_access(6));

        let merchant = IdentityContext::from_record(record(Some("merchant"), &[]));
        assert!(merchant.customer_may_access(6));
    }

    #[test]
    fn test_serialization_skips_transport_fields() {
        let ctx = IdentityContext::from_record(record(Some("merchant"), &["create_analytics_event"]))
            .with_token("secret-token");
        let json = serde_json::to_value(&ctx).unwrap();

        assert_eq!(json["role"], "merchant");
        assert_eq!(json["permissions"][0], "create_analytics_event");
        assert!(json.get("token").is_none());
        assert!(json.get("request_id").is_none());
    }
}
