// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use shopfront_store::{DefaultRole, NewAuthToken, NewUser, StoreError, User};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{ApiPath, ClientIp, Identity, ValidatedJson};
use crate::response::{AuthResponse, MessageResponse};
use crate::state::AppState;

/// Token type recorded for login-issued tokens.
pub const ACCESS_TOKEN_TYPE: &str = "access";

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// =============================================================================
// Register
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Registration response body.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

/// POST /auth/register
///
/// Creates an account with the `customer` role.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = ValidationErrors::new();
    errors.require("name", &request.name);
    errors.require("email", &request.email);
    errors.require("password", &request.password);
    errors.into_result(())?;

    let customer = state
        .store()
        .roles()
        .find_by_name(DefaultRole::Customer.as_str())
        .await?;
    if customer.is_none() {
        tracing::warn!("Customer role is missing; registering user without a role");
    }

    let password_hash = hash_password(&request.password)?;
    let user = state
        .store()
        .users()
        .create(NewUser {
            name: request.name,
            email: request.email,
            password_hash: Some(password_hash),
            role_id: customer.map(|role| role.id),
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict { .. } => ApiError::conflict("Email is already registered"),
            other => other.into(),
        })?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
///
/// Verifies credentials, issues a token and records it for revocation.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let user = state
        .store()
        .users()
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::not_found(INVALID_CREDENTIALS))?;

    // Accounts without a local password cannot log in with one.
    let matches = match user.password_hash.as_deref() {
        Some(hash) => verify_password(&request.password, hash)?,
        None => false,
    };
    if !matches {
        tracing::warn!(user_id = user.id, client_ip = ?client_ip, "Login rejected");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let role = state
        .store()
        .identities()
        .load(user.id)
        .await?
        .and_then(|identity| identity.role);

    let issued = state.codec().issue(user.id, role.as_deref())?;
    let tokens = state.store().tokens();
    let purged = tokens.purge_expired(Utc::now()).await?;
    if purged > 0 {
        tracing::debug!(purged, "Removed expired token records");
    }
    tokens
        .insert(NewAuthToken {
            user_id: user.id,
            token: issued.token.clone(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            expires_at: issued.expires_at,
        })
        .await?;

    tracing::info!(user_id = user.id, role = ?role, "User logged in");

    Ok(Json(AuthResponse::bearer(
        issued.token,
        state.codec().expiration_secs(),
    )))
}

// =============================================================================
// Logout
// =============================================================================

/// POST /auth/logout
///
/// Revokes the presented token. Tokens issued outside login are recorded as
/// revoked so they stop working too.
pub async fn logout(
    State(state): State<AppState>,
    Identity(me): Identity,
) -> ApiResult<impl IntoResponse> {
    let token = me
        .token
        .as_deref()
        .ok_or_else(|| ApiError::unauthorized("No authorization token provided"))?;

    let tokens = state.store().tokens();
    if !tokens.revoke(token).await? {
        tokens
            .insert(NewAuthToken {
                user_id: me.user_id,
                token: token.to_string(),
                token_type: ACCESS_TOKEN_TYPE.to_string(),
                expires_at: Utc::now() + Duration::seconds(state.codec().expiration_secs()),
            })
            .await?;
        tokens.revoke(token).await?;
    }

    tracing::info!(user_id = me.user_id, "User logged out");

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

// =============================================================================
// Current user
// =============================================================================

/// Current identity as seen by the authorization chain.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub permissions: Vec<String>,
}

/// GET /auth/me
pub async fn me(Identity(me): Identity) -> impl IntoResponse {
    Json(MeResponse {
        id: me.user_id,
        permissions: me.permissions.iter().map(str::to_string).collect(),
        name: me.name,
        email: me.email,
        role: me.role,
    })
}

// =============================================================================
// Assign role
// =============================================================================

/// Role assignment request body. A `null` role clears the assignment.
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    #[serde(alias = "roleId")]
    pub role_id: Option<i64>,
}

/// Role assignment response body.
#[derive(Debug, Serialize)]
pub struct AssignRoleResponse {
    pub message: String,
    pub user: User,
}

/// PUT /auth/assign-role/{id}
pub async fn assign_role(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(user_id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<AssignRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let store = state.store();
    store.users().get(user_id).await?;

    if let Some(role_id) = request.role_id {
        store
            .roles()
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Role not found"))?;
    }

    let user = store.users().set_role(user_id, request.role_id).await?;

    tracing::info!(
        admin_id = me.user_id,
        user_id,
        role_id = ?request.role_id,
        "Role assigned"
    );

    Ok(Json(AssignRoleResponse {
        message: "Role assigned to user successfully".to_string(),
        user,
    }))
}
