// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Category and product handlers.
//!
//! Product reads are public. Everything else is gated per route: categories
//! are edited by administrators, products by administrators and merchants.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use shopfront_store::{
    Category, CategoryChanges, NewCategory, NewProduct, Product, ProductChanges, StoreError,
};

use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{ApiPath, Identity, Pagination, ValidatedJson};
use crate::response::{ListResponse, MessageResponse, ResponseMeta};
use crate::state::AppState;

fn duplicate(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
    move |err| match err {
        StoreError::Conflict { .. } => ApiError::conflict(message),
        other => other.into(),
    }
}

// =============================================================================
// Categories
// =============================================================================

/// A category together with an outcome message.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub message: String,
    pub category: Category,
}

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store().categories().list().await?))
}

/// GET /categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store().categories().get(category_id).await?))
}

/// GET /categories/{id}/products
pub async fn category_products(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store().categories().products(category_id).await?))
}

/// POST /categories
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(category): ValidatedJson<NewCategory>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = ValidationErrors::new();
    errors.require("name", &category.name);
    errors.into_result(())?;

    let category = state
        .store()
        .categories()
        .create(category)
        .await
        .map_err(duplicate("Category already exists"))?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            message: "Category created successfully".to_string(),
            category,
        }),
    ))
}

/// PUT /categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<i64>,
    ValidatedJson(changes): ValidatedJson<CategoryChanges>,
) -> ApiResult<impl IntoResponse> {
    if let Some(name) = &changes.name {
        let mut errors = ValidationErrors::new();
        errors.require("name", name);
        errors.into_result(())?;
    }

    let category = state
        .store()
        .categories()
        .update(category_id, changes)
        .await
        .map_err(duplicate("Category already exists"))?;

    Ok(Json(CategoryResponse {
        message: "Category updated successfully".to_string(),
        category,
    }))
}

/// DELETE /categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store().categories().delete(category_id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}

// =============================================================================
// Products
// =============================================================================

/// A product together with an outcome message.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub message: String,
    pub product: Product,
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    Pagination(params): Pagination,
) -> ApiResult<impl IntoResponse> {
    let products = state.store().products();
    let total = products.count().await?;
    let data = products.list(params.page()).await?;

    Ok(Json(ListResponse::new(
        data,
        ResponseMeta::counted(&params, total),
    )))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store().products().get(product_id).await?))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    Identity(me): Identity,
    ValidatedJson(product): ValidatedJson<NewProduct>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = ValidationErrors::new();
    errors.require("name", &product.name);
    errors.require("sku", &product.sku);
    errors.at_least("price_cents", product.price_cents, 0);
    errors.at_least("stock", product.stock, 0);
    errors.into_result(())?;

    let product = state
        .store()
        .products()
        .create(product)
        .await
        .map_err(duplicate("SKU is already in use"))?;

    tracing::info!(user_id = me.user_id, product_id = product.id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "Product created successfully".to_string(),
            product,
        }),
    ))
}

/// PUT /products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
    ValidatedJson(changes): ValidatedJson<ProductChanges>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = ValidationErrors::new();
    if let Some(name) = &changes.name {
        errors.require("name", name);
    }
    if let Some(sku) = &changes.sku {
        errors.require("sku", sku);
    }
    if let Some(price_cents) = changes.price_cents {
        errors.at_least("price_cents", price_cents, 0);
    }
    if let Some(stock) = changes.stock {
        errors.at_least("stock", stock, 0);
    }
    errors.into_result(())?;

    let product = state
        .store()
        .products()
        .update(product_id, changes)
        .await
        .map_err(duplicate("SKU is already in use"))?;

    Ok(Json(ProductResponse {
        message: "Product updated successfully".to_string(),
        product,
    }))
}

/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Identity(me): Identity,
    ApiPath(product_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    state.store().products().delete(product_id).await?;
    tracing::info!(user_id = me.user_id, product_id, "Product deleted");
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
