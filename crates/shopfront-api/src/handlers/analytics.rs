// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Analytics event handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use shopfront_store::{AnalyticsEvent, NewAnalyticsEvent};

use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{ApiPath, Identity, Pagination, ValidatedJson};
use crate::response::{ListResponse, MessageResponse, ResponseMeta};
use crate::state::AppState;

/// An event together with an outcome message.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub message: String,
    pub event: AnalyticsEvent,
}

/// GET /analytics
pub async fn list_events(
    State(state): State<AppState>,
    Pagination(params): Pagination,
) -> ApiResult<impl IntoResponse> {
    let events = state.store().analytics().list(params.page()).await?;
    Ok(Json(ListResponse::new(
        events,
        ResponseMeta::window(&params),
    )))
}

/// POST /analytics
pub async fn record_event(
    State(state): State<AppState>,
    ValidatedJson(event): ValidatedJson<NewAnalyticsEvent>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = ValidationErrors::new();
    errors.require("action", &event.action);
    errors.into_result(())?;

    let event = state.store().analytics().record(event).await?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            message: "Analytics event recorded".to_string(),
            event,
        }),
    ))
}

/// GET /analytics/user/{user_id}
///
/// Administrators may read any user's events; everyone else only their own.
pub async fn user_events(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    if !me.is_admin() && me.user_id != user_id {
        tracing::warn!(user_id = me.user_id, target = user_id, "Analytics access denied");
        return Err(ApiError::forbidden("Access denied"));
    }
    Ok(Json(state.store().analytics().list_for_user(user_id).await?))
}

/// DELETE /analytics/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store().analytics().delete(event_id).await?;
    Ok(Json(MessageResponse::new("Analytics event deleted")))
}
