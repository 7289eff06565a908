//! JSON REST API for Till.
//!
//! Thin handlers over the domain crate: every endpoint parses a typed
//! request, resolves the caller through the bearer-token extractor, calls
//! into the store or the checkout orchestrator, and maps domain errors to
//! status codes in one place.

pub mod auth;
pub mod error;
pub mod handlers;

use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use till_commerce::checkout::Checkout;
use till_commerce::store::CommerceStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend.
    pub store: Arc<dyn CommerceStore>,
    /// Checkout workflow over the same backend.
    pub checkout: Checkout,
}

impl AppState {
    pub fn new(store: Arc<dyn CommerceStore>) -> Self {
        let checkout = Checkout::new(store.clone());
        Self { store, checkout }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // cart
        .route("/cart", get(handlers::cart::get_cart))
        .route("/cart/add", post(handlers::cart::add_to_cart))
        .route("/cart/update/{cart_id}", put(handlers::cart::update_line))
        .route("/cart/remove/{cart_id}", delete(handlers::cart::remove_line))
        // checkout
        .route("/checkout/shipping", post(handlers::checkout::set_shipping))
        .route("/checkout/payment", post(handlers::checkout::set_payment))
        .route("/checkout/review", get(handlers::checkout::review))
        .route("/checkout/place_order", post(handlers::checkout::place_order))
        // catalog (read-only)
        .route("/products", get(handlers::products::list))
        .route("/products/{product_id}", get(handlers::products::get))
        // orders
        .route("/orders", get(handlers::orders::list))
        .route("/orders/{order_id}", get(handlers::orders::get))
        .route("/orders/{order_id}/status", put(handlers::orders::update_status))
        // inventory ledger
        .route("/inventory/adjustments", post(handlers::inventory::adjust))
        .route(
            "/inventory/logs",
            get(handlers::inventory::list_logs).post(handlers::inventory::record),
        )
        .route("/inventory/logs/{log_id}", get(handlers::inventory::get_log))
        .with_state(state)
}
