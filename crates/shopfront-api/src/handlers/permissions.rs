// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Permission management handlers. Every route here is admin-only.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shopfront_store::{Permission, RolePermission};

use crate::error::{ApiResult, ValidationErrors};
use crate::extractors::{ApiPath, ValidatedJson};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Permission create/update request body.
#[derive(Debug, Deserialize)]
pub struct PermissionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A permission together with an outcome message.
#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub message: String,
    pub permission: Permission,
}

pub(crate) async fn create_permission_from(
    state: &AppState,
    request: PermissionRequest,
) -> ApiResult<Response> {
    let name = request.name.unwrap_or_default();
    let mut errors = ValidationErrors::new();
    errors.require("name", &name);
    errors.into_result(())?;

    let permission = state
        .store()
        .permissions()
        .create(&name, request.description.as_deref())
        .await?;

    tracing::info!(permission = %permission.name, "Permission created");

    Ok((
        StatusCode::CREATED,
        Json(PermissionResponse {
            message: "Permission created successfully".to_string(),
            permission,
        }),
    )
        .into_response())
}

/// GET /permissions
pub async fn list_permissions(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store().permissions().list().await?))
}

/// POST /permissions
pub async fn create_permission(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PermissionRequest>,
) -> ApiResult<impl IntoResponse> {
    create_permission_from(&state, request).await
}

/// PUT /permissions/{id}
pub async fn update_permission(
    State(state): State<AppState>,
    ApiPath(permission_id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<PermissionRequest>,
) -> ApiResult<impl IntoResponse> {
    let permission = state
        .store()
        .permissions()
        .update(
            permission_id,
            request.name.as_deref(),
            request.description.as_deref(),
        )
        .await?;

    Ok(Json(PermissionResponse {
        message: "Permission updated successfully".to_string(),
        permission,
    }))
}

/// DELETE /permissions/{id}
pub async fn delete_permission(
    State(state): State<AppState>,
    ApiPath(permission_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store().permissions().delete(permission_id).await?;
    tracing::info!(permission_id, "Permission deleted");
    Ok(Json(MessageResponse::new("Permission deleted successfully")))
}

/// Role/permission pair addressed by assign and revoke.
#[derive(Debug, Deserialize)]
pub struct RolePermissionRequest {
    #[serde(alias = "roleId")]
    pub role_id: i64,
    #[serde(alias = "permissionId")]
    pub permission_id: i64,
}

/// Grant response body.
#[derive(Debug, Serialize)]
pub struct GrantResponse {
    pub message: String,
    pub role_permission: RolePermission,
}

/// POST /permissions/assign
pub async fn assign(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RolePermissionRequest>,
) -> ApiResult<impl IntoResponse> {
    let role_permission = state
        .store()
        .permissions()
        .assign(request.role_id, request.permission_id)
        .await?;

    tracing::info!(
        role_id = request.role_id,
        permission_id = request.permission_id,
        "Permission granted"
    );

    Ok((
        StatusCode::CREATED,
        Json(GrantResponse {
            message: "Permission assigned to role successfully".to_string(),
            role_permission,
        }),
    ))
}

/// DELETE /permissions/revoke
pub async fn revoke(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RolePermissionRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .store()
        .permissions()
        .revoke(request.role_id, request.permission_id)
        .await?;

    tracing::info!(
        role_id = request.role_id,
        permission_id = request.permission_id,
        "Permission revoked"
    );

    Ok(Json(MessageResponse::new("Permission revoked successfully")))
}
