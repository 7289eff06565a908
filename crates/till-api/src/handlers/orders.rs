//! Order endpoints.
//!
//! Orders are always scoped to the authenticated caller.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::Message;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use till_commerce::error::CommerceError;
use till_commerce::ids::OrderId;
use till_commerce::order::{Order, OrderDetail, OrderStatus};

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<OrdersResponse>, ApiError> {
    let orders = state.store.orders(user_id).await?;
    Ok(Json(OrdersResponse { orders }))
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub details: Vec<OrderDetail>,
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::new(order_id);
    let (order, details) = state
        .store
        .order(user_id, order_id)
        .await?
        .ok_or(CommerceError::OrderNotFound(order_id))?;
    Ok(Json(OrderResponse { order, details }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(order_id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Message>, ApiError> {
    let order_id = OrderId::new(order_id);
    // Only the order's owner may drive its status.
    state
        .store
        .order(user_id, order_id)
        .await?
        .ok_or(CommerceError::OrderNotFound(order_id))?;
    state.store.update_order_status(order_id, request.status).await?;
    Ok(Json(Message::new("Order updated successfully")))
}
