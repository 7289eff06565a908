//! Checkout endpoints.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::Message;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use till_commerce::checkout::QuoteCustomer;
use till_commerce::ids::OrderId;
use till_commerce::money::Money;
use till_commerce::order::PaymentMethod;
use till_commerce::pricing::LinePricing;

#[derive(Debug, Deserialize)]
pub struct ShippingRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_number: String,
}

pub async fn set_shipping(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<ShippingRequest>,
) -> Result<Json<Message>, ApiError> {
    state
        .checkout
        .set_shipping(
            user_id,
            &request.full_name,
            &request.address,
            &request.contact_number,
        )
        .await
        .map_err(ApiError::shipping)?;
    Ok(Json(Message::new("Shipping info saved")))
}

/// The payment step is a placeholder: the request body is ignored and the
/// method always resolves to COD.
pub async fn set_payment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<Message> {
    let _ = state.checkout.set_payment(user_id);
    Json(Message::new("Payment set to COD by default"))
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub user_info: QuoteCustomer,
    pub items: Vec<LinePricing>,
    pub total_amount: Money,
}

pub async fn review(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ReviewResponse>, ApiError> {
    let quote = state.checkout.review(user_id).await?;
    Ok(Json(ReviewResponse {
        user_info: quote.customer,
        items: quote.items,
        total_amount: quote.total_amount,
    }))
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    #[serde(rename = "Order_ID")]
    pub order_id: OrderId,
    pub total_amount: Money,
    pub message: String,
    pub payment_method: PaymentMethod,
}

pub async fn place_order(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PlaceOrderResponse>, ApiError> {
    let placed = state.checkout.place_order(user_id).await?;
    Ok(Json(PlaceOrderResponse {
        order_id: placed.order_id,
        total_amount: placed.total_amount,
        message: "Order placed successfully".to_string(),
        payment_method: placed.payment_method,
    }))
}
