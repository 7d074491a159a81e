// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Wishlist handlers. Always scoped to the caller.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use shopfront_store::{StoreError, WishlistEntry};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiPath, Identity, ValidatedJson};
use crate::response::MessageResponse;
use crate::state::AppState;

/// A wishlist entry together with an outcome message.
#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub message: String,
    pub entry: WishlistEntry,
}

/// Wishlist addition request body.
#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    #[serde(alias = "productId")]
    pub product_id: i64,
}

/// GET /wishlist
pub async fn list_wishlist(
    State(state): State<AppState>,
    Identity(me): Identity,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store().wishlists().list_for_user(me.user_id).await?))
}

/// POST /wishlist
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Identity(me): Identity,
    ValidatedJson(request): ValidatedJson<WishlistRequest>,
) -> ApiResult<impl IntoResponse> {
    let entry = state
        .store()
        .wishlists()
        .add(me.user_id, request.product_id)
        .await
        .map_err(|err| match err {
            StoreError::Conflict { .. } => {
                ApiError::conflict("Product is already in the wishlist")
            }
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(WishlistResponse {
            message: "Product added to wishlist".to_string(),
            entry,
        }),
    ))
}

/// DELETE /wishlist/{product_id}
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(product_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state
        .store()
        .wishlists()
        .remove(me.user_id, product_id)
        .await?;
    Ok(Json(MessageResponse::new("Product removed from wishlist")))
}
