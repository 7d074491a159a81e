// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token codec: issues and verifies signed access tokens.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Claims;

/// Default token lifetime: one day.
pub const DEFAULT_EXPIRATION_SECS: i64 = 86_400;

// =============================================================================
// TokenError
// =============================================================================

/// Reasons a token is rejected or cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The signature does not match the configured secret.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The token's expiry lies in the past.
    #[error("Token has expired")]
    Expired,

    /// The token could not be parsed or carries unusable claims.
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Signing failed.
    #[error("Failed to sign token: {0}")]
    Signing(String),

    /// The codec configuration is unusable.
    #[error("Invalid token configuration: {0}")]
    Configuration(String),
}

// =============================================================================
// JwtConfig
// =============================================================================

/// JWT configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token issuer.
    pub issuer: String,
    /// Token lifetime in seconds.
    pub expiration_secs: i64,
    /// HMAC algorithm used for signing.
    #[serde(with = "algorithm_serde")]
    pub algorithm: Algorithm,
    /// Clock skew tolerance in seconds, applied to `nbf` only. Expiry is
    /// always exact.
    pub leeway_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: "shopfront".to_string(),
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            algorithm: Algorithm::HS256,
            leeway_secs: 30,
        }
    }
}

impl JwtConfig {
    /// Creates a new configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the token lifetime.
    pub fn with_expiration(mut self, duration: Duration) -> Self {
        self.expiration_secs = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        self
    }

    /// Sets the clock skew tolerance.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::Configuration(
                "JWT secret is not configured".to_string(),
            ));
        }
        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::Configuration(format!(
                "{:?} is not a shared-secret algorithm",
                self.algorithm
            )));
        }
        if self.expiration_secs <= 0 {
            return Err(TokenError::Configuration(
                "Token expiration must be positive".to_string(),
            ));
        }
        if self.secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }
        Ok(())
    }
}

// =============================================================================
// Issued / Verified tokens
// =============================================================================

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWT.
    pub token: String,
    /// Token id (`jti`).
    pub jti: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

/// The identity carried by a token that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// User id from `sub`.
    pub subject_id: i64,
    /// Role claim at issue time. Informational only.
    pub role: Option<String>,
    /// Token id (`jti`), when present.
    pub jti: Option<String>,
    /// Issue time (`iat`).
    pub issued_at: Option<DateTime<Utc>>,
    /// Absolute expiry (`exp`).
    pub expires_at: Option<DateTime<Utc>>,
}

// =============================================================================
// TokenCodec
// =============================================================================

/// Issues and verifies access tokens with a process-wide secret.
///
/// Verification is pure: it consults only the token and the secret. Revocation
/// is checked separately against the store.
#[derive(Clone)]
pub struct TokenCodec {
    config: Arc<JwtConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    inspection: Arc<Validation>,
}

impl TokenCodec {
    /// Creates a codec with the given configuration.
    pub fn new(config: JwtConfig) -> Result<Self, TokenError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub"]);
        // Leeway only widens `nbf`; `exp` is settled by the exact check in
        // `verify` before this validation runs.
        validation.leeway = config.leeway_secs;
        validation.validate_nbf = true;
        validation.validate_aud = false;

        // Reads the payload without trusting it, so expiry can be reported
        // ahead of the signature check.
        let mut inspection = Validation::new(config.algorithm);
        inspection.insecure_disable_signature_validation();
        inspection.set_required_spec_claims(&["exp", "sub"]);
        inspection.validate_exp = false;
        inspection.validate_aud = false;

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
            inspection: Arc::new(inspection),
        })
    }

    /// Issues a token for `subject_id` carrying `role`.
    pub fn issue(&self, subject_id: i64, role: Option<&str>) -> Result<IssuedToken, TokenError> {
        let claims = Claims::new(
            subject_id,
            role.map(str::to_string),
            self.config.expiration_secs,
        )
        .with_issuer(&self.config.issuer);

        let token = self.encode_claims(&claims)?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;

        Ok(IssuedToken {
            token,
            jti: claims.jti.unwrap_or_default(),
            expires_at,
        })
    }

    /// Signs arbitrary claims with the configured key.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.config.algorithm), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies a token.
    ///
    /// A token whose expiry has passed is reported as [`TokenError::Expired`]
    /// whether or not its signature is valid.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let unverified = decode::<Claims>(token, &self.decoding_key, &self.inspection)
            .map_err(|e| TokenError::Malformed(e.to_string()))?
            .claims;

        if unverified.is_expired() {
            return Err(TokenError::Expired);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })?
            .claims;

        let subject_id = claims
            .user_id()
            .ok_or_else(|| TokenError::Malformed(format!("subject {:?} is not a user id", claims.sub)))?;

        Ok(VerifiedToken {
            subject_id,
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
            role: claims.role,
            jti: claims.jti,
        })
    }

    /// Returns the token lifetime in seconds.
    pub fn expiration_secs(&self) -> i64 {
        self.config.expiration_secs
    }

    /// Returns the configured issuer.
    pub fn issuer(&self) -> &str {
        &self.config.issuer
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.config.issuer)
            .field("algorithm", &self.config.algorithm)
            .field("expiration_secs", &self.config.expiration_secs)
            .finish()
    }
}

// =============================================================================
// Algorithm Serialization
// =============================================================================

mod algorithm_serde {
    use jsonwebtoken::Algorithm;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(algorithm: &Algorithm, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match algorithm {
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            _ => "HS256",
        };
        s.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Algorithm, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.to_uppercase().as_str() {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            _ => Err(serde::de::Error::custom(format!(
                "Unsupported algorithm: {} (expected HS256, HS384 or HS512)",
                s
            ))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
