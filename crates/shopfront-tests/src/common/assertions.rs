// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Assertions
//!
//! Assertions over [`TestResponse`] that print the body on failure.

use axum::http::StatusCode;
use serde_json::Value;

use super::harness::TestResponse;

/// Assertions for API responses.
pub trait ResponseAssertions {
    /// Asserts the status code and returns the JSON body.
    fn assert_status(&self, expected: StatusCode) -> Value;

    /// Asserts an error response with the given status, code and message.
    fn assert_error(&self, status: StatusCode, code: &str, message: &str);

    /// Asserts a gate denial of the given kind (`"role"` or `"permission"`).
    fn assert_denied(&self, reason: &str);
}

impl ResponseAssertions for TestResponse {
    fn assert_status(&self, expected: StatusCode) -> Value {
        assert_eq!(
            self.status,
            expected,
            "unexpected status, body: {}",
            self.text()
        );
        self.json()
    }

    fn assert_error(&self, status: StatusCode, code: &str, message: &str) {
        let body = self.assert_status(status);
        assert_eq!(body["code"], code, "body: {}", body);
        assert_eq!(body["error"], message, "body: {}", body);
    }

    fn assert_denied(&self, reason: &str) {
        let body = self.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN", "body: {}", body);
        assert_eq!(body["reason"], reason, "body: {}", body);
    }
}

/// Asserts that `items` (a JSON array) contains an object whose `key` equals `value`.
pub fn assert_contains_item(items: &Value, key: &str, value: &Value) {
    let array = items.as_array().expect("JSON array");
    assert!(
        array.iter().any(|item| &item[key] == value),
        "no item with {} = {} in {}",
        key,
        value,
        items
    );
}
