// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Tower middleware for the protected routes.
//!
//! - [`AuthLayer`]: bearer token verification, revocation check and identity
//!   resolution
//! - [`GateLayer`]: per-route role and permission gates

mod auth;
mod gate;

pub use auth::{bearer_token, AuthLayer, AuthMiddleware};
pub use gate::{GateLayer, GateMiddleware};
