// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Shopfront Integration Tests
//!
//! End-to-end tests that drive the full router (auth middleware, gates,
//! handlers) against an in-memory store with `tower::ServiceExt::oneshot`.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `harness`: [`TestApp`](common::harness::TestApp), the app under test
//!   - `fixtures`: request payloads and test constants
//!   - `assertions`: response assertion helpers
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p shopfront-tests
//! cargo test -p shopfront-tests --test integration_authorization
//! ```
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use shopfront_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::spawn().await;
//!     let (_, token) = app.login_as("admin").await;
//!     app.get("/users", Some(&token)).await.assert_status(StatusCode::OK);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use axum::http::StatusCode;
    pub use serde_json::{json, Value};
}
