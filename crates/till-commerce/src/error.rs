//! Commerce error types.

use crate::ids::{CartLineId, LogEntryId, OrderId, ProductId, UserId};
use thiserror::Error;

/// Errors that can occur in checkout and inventory operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Malformed or missing required input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Cart line not found.
    #[error("Cart item not found: {0}")]
    CartLineNotFound(CartLineId),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Inventory log entry not found.
    #[error("Inventory log not found: {0}")]
    LogEntryNotFound(LogEntryId),

    /// Checkout attempted with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Missing or invalid identity.
    #[error("Invalid or expired credentials")]
    Unauthorized,

    /// Invalid order status transition.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Removing more stock than is on hand.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Failure communicating with persistent storage.
    #[error("Storage error: {0}")]
    Storage(String),
}
