// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Table-level repositories.
//!
//! Each repository borrows the pool from a [`Store`](crate::Store) and is
//! created on demand through its accessor (`store.users()`, `store.roles()`).

mod addresses;
mod analytics;
mod carts;
mod categories;
mod identity;
mod orders;
mod permissions;
mod products;
mod roles;
mod tokens;
mod users;
mod wishlists;

pub use addresses::AddressRepository;
pub use analytics::AnalyticsRepository;
pub use carts::CartRepository;
pub use categories::CategoryRepository;
pub use identity::IdentityRepository;
pub use orders::OrderRepository;
pub use permissions::PermissionRepository;
pub use products::ProductRepository;
pub use roles::{RoleChanges, RoleRepository};
pub use tokens::TokenRepository;
pub use users::UserRepository;
pub use wishlists::WishlistRepository;

/// Row window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}
