// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Order handlers.
//!
//! Customers place and read only their own orders; a customer listing is
//! always narrowed to the caller. Status changes and deletion are left to
//! administrators by the route gates.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopfront_store::{
    DefaultRole, NewOrder, Order, OrderFilter, OrderLine, OrderStatus, OrderWithItems,
};

use crate::auth::IdentityContext;
use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{ApiPath, ApiQuery, Identity, Pagination, ValidatedJson};
use crate::response::{ListResponse, MessageResponse, ResponseMeta};
use crate::state::AppState;

fn ensure_own_order(me: &IdentityContext, owner_id: i64) -> ApiResult<()> {
    if me.customer_may_access(owner_id) {
        Ok(())
    } else {
        tracing::warn!(user_id = me.user_id, owner = owner_id, "Customer accessed another order");
        Err(ApiError::forbidden("Access denied"))
    }
}

/// Parses an order status, rejecting unknown names with a 422.
fn parse_status(value: &str) -> ApiResult<OrderStatus> {
    OrderStatus::parse(value).ok_or_else(|| {
        let allowed: Vec<&str> = OrderStatus::ALL.iter().map(OrderStatus::as_str).collect();
        let mut errors = ValidationErrors::new();
        errors.reject("status", format!("status must be one of {}", allowed.join(", ")));
        ApiError::Validation {
            message: "status".to_string(),
            errors: Some(errors),
        }
    })
}

/// An order together with an outcome message.
#[derive(Debug, Serialize)]
pub struct OrderResponse<T> {
    pub message: String,
    pub order: T,
}

/// `GET /orders` filters. Dates are RFC 3339 and inclusive.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderQuery {
    #[serde(alias = "userId")]
    pub user_id: Option<i64>,
    pub status: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(alias = "endDate")]
    pub end_date: Option<DateTime<Utc>>,
}

/// GET /orders
pub async fn list_orders(
    State(state): State<AppState>,
    Identity(me): Identity,
    Pagination(params): Pagination,
    ApiQuery(query): ApiQuery<OrderQuery>,
) -> ApiResult<impl IntoResponse> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let mut filter = OrderFilter {
        user_id: query.user_id,
        status,
        created_from: query.start_date,
        created_to: query.end_date,
    };
    if me.has_role(DefaultRole::Customer.as_str()) {
        if let Some(owner_id) = filter.user_id {
            ensure_own_order(&me, owner_id)?;
        }
        filter.user_id = Some(me.user_id);
    }

    let orders = state.store().orders();
    let total = orders.count(filter).await?;
    let data = orders.list(filter, params.page()).await?;

    Ok(Json(ListResponse::new(
        data,
        ResponseMeta::counted(&params, total),
    )))
}

/// GET /orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(order_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let order = state.store().orders().get(order_id).await?;
    ensure_own_order(&me, order.order.user_id)?;
    Ok(Json(order))
}

/// Order placement request body. `user_id` defaults to the caller.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default, alias = "userId")]
    pub user_id: Option<i64>,
    #[serde(default, alias = "addressId")]
    pub address_id: Option<i64>,
    #[serde(default, alias = "paymentMethod")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    Identity(me): Identity,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = request.user_id.unwrap_or(me.user_id);
    state.store().users().get(user_id).await?;
    ensure_own_order(&me, user_id)?;

    let mut errors = ValidationErrors::new();
    if request.items.is_empty() {
        errors.reject("items", "items must contain at least one line");
    }
    for line in &request.items {
        errors.at_least("quantity", line.quantity, 1);
    }
    errors.into_result(())?;

    let order: OrderWithItems = state
        .store()
        .orders()
        .create(NewOrder {
            user_id,
            address_id: request.address_id,
            payment_method: request.payment_method,
            lines: request.items,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "Order created successfully".to_string(),
            order,
        }),
    ))
}

/// Status change request body.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: String,
}

/// PUT /orders/{id}
pub async fn update_order(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(order_id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    let status = parse_status(&request.status)?;
    let order: Order = state.store().orders().update_status(order_id, status).await?;
    tracing::info!(admin_id = me.user_id, order_id, status = %status, "Order status updated");

    Ok(Json(OrderResponse {
        message: "Order updated successfully".to_string(),
        order,
    }))
}

/// DELETE /orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(order_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store().orders().delete(order_id).await?;
    tracing::info!(admin_id = me.user_id, order_id, "Order deleted");
    Ok(Json(MessageResponse::new("Order deleted successfully")))
}
