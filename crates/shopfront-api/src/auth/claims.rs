// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    // =========================================================================
    // Standard JWT Claims (RFC 7519)
    // =========================================================================
    /// Subject: the user id, as a decimal string.
    pub sub: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// Not before time (Unix timestamp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// JWT ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    // =========================================================================
    // Custom Claims
    // =========================================================================
    /// Role name at issue time. Informational: authorization always uses the
    /// role resolved from the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    /// Creates claims for `user_id` valid for `expires_in_secs` from now.
    ///
    /// A negative duration produces claims that are already expired.
    pub fn new(user_id: i64, role: Option<String>, expires_in_secs: i64) -> Self {
        let now = Utc::now().timestamp();

        Self {
            sub: user_id.to_string(),
            exp: now + expires_in_secs,
            iat: now,
            nbf: Some(now.min(now + expires_in_secs)),
            iss: None,
            jti: Some(Uuid::now_v7().to_string()),
            role,
        }
    }

    /// Parses the subject as a user id.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    /// Returns `true` once `now` has reached `exp`. No skew allowance.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// [`is_expired_at`](Self::is_expired_at) against the current clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issued at time as a DateTime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(42, Some("admin".to_string()), 3600).with_issuer("shopfront");

        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role.as_deref(), Some("admin"));
        assert_eq!(claims.iss.as_deref(), Some("shopfront"));
        assert!(!claims.is_expired());
        assert!(claims.jti.is_some());
    }

    #[test]
    fn test_claims_expiration() {
        let expired = Claims::new(1, None, -3600);
        assert!(expired.is_expired());
        assert!(expired.expires_at().is_some());

        let claims = Claims::new(1, None, 60);
        assert!(!claims.is_expired_at(claims.exp - 1));
        assert!(claims.is_expired_at(claims.exp));
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            ..Claims::new(1, None, 60)
        };
        assert_eq!(claims.user_id(), None);
    }
}
