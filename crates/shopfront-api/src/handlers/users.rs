// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User and address handlers.
//!
//! Customers may only act on their own user id. The target is looked up
//! first so that an unknown id reports 404 before any ownership denial.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use shopfront_store::{Address, NewAddress, NewUser, StoreError, User, UserChanges};

use crate::auth::password::hash_password;
use crate::auth::IdentityContext;
use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{ApiPath, Identity, Pagination, ValidatedJson};
use crate::response::{ListResponse, MessageResponse, ResponseMeta};
use crate::state::AppState;

fn ensure_self_for_customer(me: &IdentityContext, user_id: i64) -> ApiResult<()> {
    if me.customer_may_access(user_id) {
        Ok(())
    } else {
        tracing::warn!(user_id = me.user_id, target = user_id, "Customer accessed another user");
        Err(ApiError::forbidden("Access denied"))
    }
}

fn email_conflict(err: StoreError) -> ApiError {
    match err {
        StoreError::Conflict { .. } => ApiError::conflict("Email is already registered"),
        other => other.into(),
    }
}

/// A user together with an outcome message.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

// =============================================================================
// Users
// =============================================================================

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Pagination(params): Pagination,
) -> ApiResult<impl IntoResponse> {
    let users = state.store().users();
    let total = users.count().await?;
    let data = users.list(params.page()).await?;

    Ok(Json(ListResponse::new(
        data,
        ResponseMeta::counted(&params, total),
    )))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let user = state.store().users().get(user_id).await?;
    ensure_self_for_customer(&me, user_id)?;
    Ok(Json(user))
}

/// Admin user creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, alias = "roleId")]
    pub role_id: Option<i64>,
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = ValidationErrors::new();
    errors.require("name", &request.name);
    errors.require("email", &request.email);
    errors.require("password", &request.password);
    errors.into_result(())?;

    if let Some(role_id) = request.role_id {
        state
            .store()
            .roles()
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Role not found"))?;
    }

    let user = state
        .store()
        .users()
        .create(NewUser {
            name: request.name,
            email: request.email,
            password_hash: Some(hash_password(&request.password)?),
            role_id: request.role_id,
        })
        .await
        .map_err(email_conflict)?;

    tracing::info!(user_id = user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// Profile update request body. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(user_id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let users = state.store().users();
    users.get(user_id).await?;
    ensure_self_for_customer(&me, user_id)?;

    let password_hash = match request.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };
    let password_changed = password_hash.is_some();

    let user = users
        .update(
            user_id,
            UserChanges {
                name: request.name,
                email: request.email,
                password_hash,
                phone_number: request.phone_number,
            },
        )
        .await
        .map_err(email_conflict)?;

    // Tokens issued under the old password stop working.
    if password_changed {
        let revoked = state.store().tokens().revoke_all_for_user(user_id).await?;
        tracing::info!(user_id, revoked, "Password changed, sessions revoked");
    }

    Ok(Json(UserResponse {
        message: "User updated successfully".to_string(),
        user,
    }))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store().users().delete(user_id).await?;
    tracing::info!(admin_id = me.user_id, user_id, "User deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

// =============================================================================
// Addresses
// =============================================================================

/// An address together with an outcome message.
#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub message: String,
    pub address: Address,
}

/// GET /users/{id}/addresses
pub async fn list_addresses(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store().users().get(user_id).await?;
    ensure_self_for_customer(&me, user_id)?;
    Ok(Json(state.store().addresses().list_for_user(user_id).await?))
}

/// POST /users/{id}/addresses
pub async fn create_address(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(user_id): ApiPath<i64>,
    ValidatedJson(address): ValidatedJson<NewAddress>,
) -> ApiResult<impl IntoResponse> {
    state.store().users().get(user_id).await?;
    ensure_self_for_customer(&me, user_id)?;

    let mut errors = ValidationErrors::new();
    errors.require("address_line1", &address.address_line1);
    errors.require("city", &address.city);
    errors.require("country", &address.country);
    errors.into_result(())?;

    let address = state.store().addresses().create(user_id, address).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddressResponse {
            message: "Address created successfully".to_string(),
            address,
        }),
    ))
}

/// DELETE /users/{id}/addresses/{address_id}
pub async fn delete_address(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath((user_id, address_id)): ApiPath<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    state.store().users().get(user_id).await?;
    ensure_self_for_customer(&me, user_id)?;
    state.store().addresses().delete(user_id, address_id).await?;
    Ok(Json(MessageResponse::new("Address deleted successfully")))
}
