// src/handlers/product.rs
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument};

use crate::dtos::product::{ProductPayload, ProductResponse};
use crate::error::AppError;
use crate::state::AppState;

// GET /api/products - List all products
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.products.list().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

// GET /api/products/{id} - Get single product
#[instrument(skip(state))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state
        .products
        .find(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(ProductResponse::from(product)))
}

// POST /api/products - Create new product
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let fields = payload.validate()?;
    let product = state.products.insert(fields).await?;
    info!(id = product.id, "Product created");

    let location = format!("/api/products/{}", product.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProductResponse::from(product)),
    ))
}

// PUT /api/products/{id} - Overwrite every field, last writer wins
#[instrument(skip(state, payload))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<StatusCode, AppError> {
    let existing = state
        .products
        .find(id)
        .await?
        .ok_or(AppError::NotFound)?;
    let fields = payload.validate()?;

    let updated = existing.with_fields(fields);
    // Row may have been deleted since the read
    if !state.products.update(&updated).await? {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/products/{id} - Delete product
#[instrument(skip(state))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    if !state.products.delete(id).await? {
        return Err(AppError::NotFound);
    }

    info!(id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
