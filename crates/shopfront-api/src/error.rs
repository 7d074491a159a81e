// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The single error type handlers and middleware return.
//!
//! Every error renders as a flat JSON body:
//!
//! ```json
//! { "error": "Access denied: missing permission", "code": "FORBIDDEN", "reason": "permission" }
//! ```
//!
//! `reason` is present on gate denials, `details` on validation and server
//! errors. Failures from the store and the auth chain convert with `?`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shopfront_store::StoreError;
use thiserror::Error;

use crate::auth::{ForbiddenReason, GateError, ResolveError, TokenError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned for every token verification failure.
pub const TOKEN_INVALID: &str = "Token invalid";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Malformed JSON, path or query.
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// No usable `Authorization: Bearer` header (401).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Bad signature, expired, malformed or revoked token (403).
    ///
    /// `cause` is logged; the body always says [`TOKEN_INVALID`] so a
    /// caller cannot tell these apart.
    #[error("Token invalid: {cause}")]
    TokenInvalid { cause: String },

    /// `reason` is set when a role or permission gate denied the request,
    /// and absent for ownership checks inside handlers.
    #[error("Forbidden: {message}")]
    Forbidden {
        reason: Option<ForbiddenReason>,
        message: String,
    },

    /// Well-formed input that fails business rules (422).
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        errors: Option<ValidationErrors>,
    },

    /// Duplicate email, role name, permission name or grant.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        details: Option<String>,
    },
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn token_invalid(cause: impl ToString) -> Self {
        Self::TokenInvalid {
            cause: cause.to_string(),
        }
    }

    /// A denial from an ownership check, without a gate reason.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: None,
            message: message.into(),
        }
    }

    /// A denial from a role or permission gate.
    pub fn denied(reason: ForbiddenReason) -> Self {
        let message = match reason {
            ForbiddenReason::Role => "Access denied: insufficient role",
            ForbiddenReason::Permission => "Access denied: missing permission",
        };
        Self::Forbidden {
            reason: Some(reason),
            message: message.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: None,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            details: None,
        }
    }

    /// An internal error whose cause is returned as `details`.
    pub fn internal_with_details(message: impl Into<String>, details: impl ToString) -> Self {
        Self::Internal {
            message: message.into(),
            details: Some(details.to_string()),
        }
    }

    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::TokenInvalid { .. } => (StatusCode::FORBIDDEN, "TOKEN_INVALID"),
            ApiError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    pub fn error_code(&self) -> &'static str {
        self.classify().1
    }

    /// The `error` field of the body.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::TokenInvalid { .. } => TOKEN_INVALID.to_string(),
            ApiError::Validation { message, .. } => format!("Validation failed: {}", message),
            ApiError::NotFound { message }
            | ApiError::BadRequest { message }
            | ApiError::Unauthorized { message }
            | ApiError::Forbidden { message, .. }
            | ApiError::Conflict { message }
            | ApiError::Internal { message, .. } => message.clone(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        let reason = match self {
            ApiError::Forbidden { reason, .. } => *reason,
            _ => None,
        };
        let details = match self {
            ApiError::Validation {
                errors: Some(errors),
                ..
            } => serde_json::to_value(errors).ok(),
            ApiError::Internal {
                details: Some(details),
                ..
            } => Some(serde_json::Value::String(details.clone())),
            _ => None,
        };

        ErrorBody {
            error: self.user_message(),
            code: self.error_code().to_string(),
            reason,
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        match &self {
            ApiError::Internal { .. } => {
                tracing::error!(error = %self, code, status = %status, "Request failed")
            }
            ApiError::Unauthorized { .. }
            | ApiError::TokenInvalid { .. }
            | ApiError::Forbidden { .. } => {
                tracing::warn!(error = %self, code, status = %status, "Request denied")
            }
            _ => tracing::debug!(error = %self, code, status = %status, "Request rejected"),
        }

        (status, Json(self.body())).into_response()
    }
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<ForbiddenReason>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<serde_json::Value>,
}

// =============================================================================
// Field validation
// =============================================================================

/// Required-field checks collected across a request body, reported together.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

/// One failed field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `field` as missing when `value` is blank.
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.reject(field, format!("{} is required", field));
        }
    }

    /// Records `field` as invalid.
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Records `field` as invalid when `value` is below `min`.
    pub fn at_least(&mut self, field: &str, value: i64, min: i64) {
        if value < min {
            self.reject(field, format!("{} must be at least {}", field, min));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(value)` when nothing failed, otherwise a 422 naming the fields.
    pub fn into_result<T>(self, value: T) -> ApiResult<T> {
        if self.is_empty() {
            return Ok(value);
        }
        let names: Vec<&str> = self.fields.iter().map(|f| f.field.as_str()).collect();
        Err(ApiError::Validation {
            message: names.join(", "),
            errors: Some(self),
        })
    }
}

impl std::error::Error for ValidationErrors {}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} invalid field(s)", self.fields.len())
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => {
                let mut chars = entity.chars();
                let entity: String = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                };
                ApiError::not_found(format!("{} not found", entity))
            }
            StoreError::Conflict { message } => ApiError::conflict(message),
            StoreError::InvalidReference { message } => ApiError::bad_request(message),
            other if other.is_transient() => {
                ApiError::internal_with_details("Database unavailable", other)
            }
            other => ApiError::internal_with_details("Database error", other),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidSignature | TokenError::Expired | TokenError::Malformed(_) => {
                ApiError::token_invalid(err)
            }
            TokenError::Signing(_) | TokenError::Configuration(_) => {
                ApiError::internal_with_details("Token service error", err)
            }
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UserNotFound(_) => ApiError::not_found("User not found"),
            ResolveError::Revoked => ApiError::token_invalid(err),
            ResolveError::Store(e) => ApiError::internal_with_details("Identity lookup failed", e),
        }
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Unauthenticated => ApiError::unauthorized("Authentication required"),
            GateError::Forbidden { reason, .. } => ApiError::denied(reason),
        }
    }
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(err: argon2::password_hash::Error) -> Self {
        ApiError::internal_with_details("Password hashing failed", err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("Invalid JSON: {}", err))
    }
}
