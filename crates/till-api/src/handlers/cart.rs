//! Cart endpoints.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::Msg;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use till_commerce::ids::{CartLineId, ProductId};
use till_commerce::money::Money;
use till_commerce::pricing::{self, LinePricing};

/// Cart view: priced lines plus the cart total.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<LinePricing>,
    pub cart_total: Money,
}

pub async fn get_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CartResponse>, ApiError> {
    let lines = state.store.cart(user_id).await?;
    let priced = pricing::price_cart(&lines)?;
    Ok(Json(CartResponse {
        items: priced.lines,
        cart_total: priced.total,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<Msg>), ApiError> {
    state
        .store
        .add_to_cart(user_id, request.product_id, request.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(Msg::new("Added to cart"))))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

pub async fn update_line(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(cart_id): Path<i64>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<Msg>, ApiError> {
    state
        .store
        .update_cart_line(CartLineId::new(cart_id), request.quantity)
        .await?;
    Ok(Json(Msg::new("Quantity updated")))
}

pub async fn remove_line(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(cart_id): Path<i64>,
) -> Result<Json<Msg>, ApiError> {
    state.store.remove_cart_line(CartLineId::new(cart_id)).await?;
    Ok(Json(Msg::new("Item removed")))
}
