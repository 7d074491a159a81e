// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers.
//!
//! Authorization is enforced by the layers the router attaches to each
//! route; handlers only add ownership checks.

pub mod analytics;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod health;
pub mod orders;
pub mod permissions;
pub mod roles;
pub mod users;
pub mod wishlist;
