// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Cart handlers under `/users/{id}/cart`.
//!
//! Only the owner changes cart items. Administrators may also read and empty
//! any cart.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use shopfront_store::Cart;

use crate::auth::IdentityContext;
use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{ApiPath, Identity, ValidatedJson};
use crate::response::MessageResponse;
use crate::state::AppState;

fn ensure_owner(me: &IdentityContext, user_id: i64) -> ApiResult<()> {
    if me.user_id == user_id {
        return Ok(());
    }
    tracing::warn!(user_id = me.user_id, target = user_id, "Cart change by non-owner");
    Err(ApiError::forbidden("Access denied"))
}

fn ensure_owner_or_admin(me: &IdentityContext, user_id: i64) -> ApiResult<()> {
    if me.is_admin() {
        return Ok(());
    }
    ensure_owner(me, user_id)
}

/// A cart together with an outcome message.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub message: String,
    pub cart: Cart,
}

/// Cart item request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(alias = "productId")]
    pub product_id: i64,
    #[serde(default = "one")]
    pub quantity: i64,
}

fn one() -> i64 {
    1
}

/// Quantity change request body.
#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i64,
}

/// GET /users/{id}/cart
pub async fn get_cart(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store().users().get(user_id).await?;
    ensure_owner_or_admin(&me, user_id)?;
    Ok(Json(state.store().carts().get_for_user(user_id).await?))
}

/// POST /users/{id}/cart/items
pub async fn add_item(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(user_id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<AddItemRequest>,
) -> ApiResult<impl IntoResponse> {
    state.store().users().get(user_id).await?;
    ensure_owner(&me, user_id)?;

    let mut errors = ValidationErrors::new();
    errors.at_least("quantity", request.quantity, 1);
    errors.into_result(())?;

    let cart = state
        .store()
        .carts()
        .add_item(user_id, request.product_id, request.quantity)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CartResponse {
            message: "Product added to cart".to_string(),
            cart,
        }),
    ))
}

/// PUT /users/{id}/cart/items/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath((user_id, item_id)): ApiPath<(i64, i64)>,
    ValidatedJson(request): ValidatedJson<QuantityRequest>,
) -> ApiResult<impl IntoResponse> {
    state.store().users().get(user_id).await?;
    ensure_owner(&me, user_id)?;

    let mut errors = ValidationErrors::new();
    errors.at_least("quantity", request.quantity, 1);
    errors.into_result(())?;

    let cart = state
        .store()
        .carts()
        .set_quantity(user_id, item_id, request.quantity)
        .await?;

    Ok(Json(CartResponse {
        message: "Cart item updated".to_string(),
        cart,
    }))
}

/// DELETE /users/{id}/cart/items/{item_id}
pub async fn remove_item(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath((user_id, item_id)): ApiPath<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    state.store().users().get(user_id).await?;
    ensure_owner(&me, user_id)?;
    state.store().carts().remove_item(user_id, item_id).await?;
    Ok(Json(MessageResponse::new("Product removed from cart")))
}

/// DELETE /users/{id}/cart
pub async fn clear_cart(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store().users().get(user_id).await?;
    ensure_owner_or_admin(&me, user_id)?;
    state.store().carts().clear(user_id).await?;
    Ok(Json(MessageResponse::new("Cart deleted")))
}
