// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role management handlers. Every route here is admin-only.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use shopfront_store::{RoleChanges, RoleWithPermissions};

use crate::error::{ApiResult, ValidationErrors};
use crate::extractors::{ApiPath, ValidatedJson};
use crate::handlers::permissions::{create_permission_from, PermissionRequest};
use crate::response::MessageResponse;
use crate::state::AppState;

/// A role together with an outcome message.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub message: String,
    pub role: RoleWithPermissions,
}

/// GET /roles
pub async fn list_roles(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store().roles().list_with_permissions().await?))
}

/// Role creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Permission ids granted on creation.
    #[serde(default)]
    pub permissions: Option<Vec<i64>>,
}

/// POST /roles
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = ValidationErrors::new();
    errors.require("name", &request.name);
    errors.into_result(())?;

    let role = state
        .store()
        .roles()
        .create(
            &request.name,
            request.description.as_deref(),
            request.permissions.as_deref().unwrap_or_default(),
        )
        .await?;

    tracing::info!(role_id = role.role.id, role = %role.role.name, "Role created");

    Ok((
        StatusCode::CREATED,
        Json(RoleResponse {
            message: "Role created successfully".to_string(),
            role,
        }),
    ))
}

/// Role update request body. A present `permissions` list replaces the
/// role's whole permission set.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Option<Vec<i64>>,
}

/// PUT /roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    ApiPath(role_id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let role = state
        .store()
        .roles()
        .update(
            role_id,
            RoleChanges {
                name: request.name,
                description: request.description,
                permission_ids: request.permissions,
            },
        )
        .await?;

    tracing::info!(role_id, "Role updated");

    Ok(Json(RoleResponse {
        message: "Role updated successfully".to_string(),
        role,
    }))
}

/// DELETE /roles/{id}
pub async fn delete_role(
    State(state): State<AppState>,
    ApiPath(role_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store().roles().delete(role_id).await?;
    tracing::info!(role_id, "Role deleted");
    Ok(Json(MessageResponse::new("Role deleted successfully")))
}

/// Permission grant request body.
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    #[serde(alias = "permissionId")]
    pub permission_id: i64,
}

/// POST /roles/{id}/permissions
pub async fn assign_permission(
    State(state): State<AppState>,
    ApiPath(role_id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<GrantRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .store()
        .permissions()
        .assign(role_id, request.permission_id)
        .await?;
    Ok(Json(MessageResponse::new(
        "Permission assigned to role successfully",
    )))
}

/// DELETE /roles/{id}/permissions/{permission_id}
pub async fn revoke_permission(
    State(state): State<AppState>,
    ApiPath((role_id, permission_id)): ApiPath<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    state
        .store()
        .permissions()
        .revoke(role_id, permission_id)
        .await?;
    Ok(Json(MessageResponse::new(
        "Permission revoked from role successfully",
    )))
}

/// GET /roles/permissions
pub async fn list_role_permissions(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store().permissions().list().await?))
}

/// POST /roles/permissions
pub async fn create_role_permission(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PermissionRequest>,
) -> ApiResult<impl IntoResponse> {
    create_permission_from(&state, request).await
}
