//! Request handlers.

pub mod cart;
pub mod checkout;
pub mod inventory;
pub mod orders;
pub mod products;

use serde::Serialize;

/// `{"msg": ...}` response body used by the cart endpoints.
#[derive(Debug, Serialize)]
pub struct Msg {
    pub msg: String,
}

impl Msg {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// `{"message": ...}` response body used by the checkout and order endpoints.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
