//! Catalog read endpoints.
//!
//! Catalog management is external; this surface is read-only.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use till_commerce::catalog::Product;
use till_commerce::error::CommerceError;
use till_commerce::ids::ProductId;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.store.products().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product_id = ProductId::new(product_id);
    let product = state
        .store
        .product(product_id)
        .await?
        .ok_or(CommerceError::ProductNotFound(product_id))?;
    Ok(Json(product))
}
