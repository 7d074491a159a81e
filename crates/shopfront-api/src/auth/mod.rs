// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization.
//!
//! The request path runs token verification ([`TokenCodec`]), identity
//! resolution ([`IdentityResolver`]) and then the route's gates
//! ([`RouteGuard`]). Password hashing lives in [`password`].

mod claims;
mod context;
mod gate;
mod jwt;
pub mod password;
pub mod permission;
mod resolver;

pub use claims::Claims;
pub use context::IdentityContext;
pub use gate::{ForbiddenReason, Gate, GateError, RouteGuard};
pub use jwt::{
    IssuedToken, JwtConfig, TokenCodec, TokenError, VerifiedToken, DEFAULT_EXPIRATION_SECS,
};
pub use permission::PermissionSet;
pub use resolver::{IdentityResolver, ResolveError};
