// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authorization gates.
//!
//! A [`Gate`] is a single predicate over the resolved identity. A
//! [`RouteGuard`] is the conjunction of the gates declared on one route.
//! Role gates always run before permission gates, whatever the declaration
//! order, and the first failure short-circuits.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::IdentityContext;

// =============================================================================
// GateError
// =============================================================================

/// Which kind of gate rejected the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForbiddenReason {
    Role,
    Permission,
}

impl ForbiddenReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForbiddenReason::Role => "role",
            ForbiddenReason::Permission => "permission",
        }
    }
}

impl fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gate failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// No identity was attached to the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The identity does not satisfy the gate.
    #[error("Access denied: {reason} {required} required")]
    Forbidden {
        reason: ForbiddenReason,
        /// Human-readable requirement ("one of [admin]", "view_users").
        required: String,
    },
}

// =============================================================================
// Gate
// =============================================================================

/// A single authorization predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Passes iff the identity's role is one of the listed roles.
    AnyRole(Vec<String>),
    /// Passes iff the identity holds the named permission.
    Permission(String),
}

impl Gate {
    /// Role-in-set gate.
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Gate::AnyRole(roles.into_iter().map(Into::into).collect())
    }

    /// Permission-in-set gate.
    pub fn permission(name: impl Into<String>) -> Self {
        Gate::Permission(name.into())
    }

    /// Evaluates the gate. A missing identity fails closed.
    pub fn check(&self, identity: Option<&IdentityContext>) -> Result<(), GateError> {
        let identity = identity.ok_or(GateError::Unauthenticated)?;

        match self {
            Gate::AnyRole(allowed) if identity.has_any_role(allowed) => Ok(()),
            Gate::AnyRole(allowed) => Err(GateError::Forbidden {
                reason: ForbiddenReason::Role,
                required: format!("one of [{}]", allowed.join(", ")),
            }),
            Gate::Permission(name) if identity.has_permission(name) => Ok(()),
            Gate::Permission(name) => Err(GateError::Forbidden {
                reason: ForbiddenReason::Permission,
                required: name.clone(),
            }),
        }
    }

    fn is_role_gate(&self) -> bool {
        matches!(self, Gate::AnyRole(_))
    }
}

// =============================================================================
// RouteGuard
// =============================================================================

/// Ordered conjunction of gates for one route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGuard {
    gates: Vec<Gate>,
}

impl RouteGuard {
    /// A guard with no gates (admits any resolved identity).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a role-in-set gate.
    pub fn require_any_role<I, S>(self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_gate(Gate::any_role(roles))
    }

    /// Adds a permission gate.
    pub fn require_permission(self, name: impl Into<String>) -> Self {
        self.with_gate(Gate::permission(name))
    }

    /// Adds a gate, keeping role gates ahead of permission gates.
    pub fn with_gate(mut self, gate: Gate) -> Self {
        let position = if gate.is_role_gate() {
            self.gates
                .iter()
                .position(|g| !g.is_role_gate())
                .unwrap_or(self.gates.len())
        } else {
            self.gates.len()
        };
        self.gates.insert(position, gate);
        self
    }

    /// Evaluates every gate in order, stopping at the first failure.
    pub fn check(&self, identity: Option<&IdentityContext>) -> Result<(), GateError> {
        if identity.is_none() {
            return Err(GateError::Unauthenticated);
        }
        self.gates.iter().try_for_each(|gate| gate.check(identity))
    }

    /// The gates in evaluation order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }
}

// =============================================================================
// Tests
// =============================================================================
