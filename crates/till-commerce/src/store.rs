//! The storage seam.
//!
//! [`CommerceStore`] is implemented by the PostgreSQL adapter (`till-db`)
//! and the in-memory adapter (`till-memory`). Every method is one
//! request-scoped unit of work: a mutating operation either fully applies
//! or leaves no trace.

use crate::cart::CartLine;
use crate::catalog::Product;
use crate::checkout::{ShippingInfo, ShippingProfile};
use crate::error::CommerceError;
use crate::ids::{CartLineId, LogEntryId, OrderId, ProductId, UserId};
use crate::inventory::{ChangeType, InventoryLogEntry, StockAdjustment};
use crate::order::{Order, OrderDetail, OrderStatus, PaymentMethod, PlacedOrder};
use async_trait::async_trait;

/// Storage backend for carts, orders, the inventory ledger, and the
/// adjacent user/session/catalog reads this core depends on.
#[async_trait]
pub trait CommerceStore: Send + Sync + 'static {
    /// Resolve a bearer token to the user it identifies.
    ///
    /// Returns `None` for unknown or expired tokens. Token issuance belongs
    /// to the auth collaborator, not this core.
    async fn resolve_token(&self, token: &str) -> Result<Option<UserId>, CommerceError>;

    // -- catalog (read-only here; stock moves via inventory adjustments) --

    /// List all products.
    async fn products(&self) -> Result<Vec<Product>, CommerceError>;

    /// Fetch one product.
    async fn product(&self, product_id: ProductId) -> Result<Option<Product>, CommerceError>;

    // -- cart --

    /// The user's cart lines joined with product name/price/image.
    async fn cart(&self, user_id: UserId) -> Result<Vec<CartLine>, CommerceError>;

    /// Add a product to the cart.
    ///
    /// Merge semantics: if a line for `(user, product)` already exists its
    /// quantity is incremented, atomically, so concurrent adds can neither
    /// duplicate the line nor drop an increment. A missing product or a
    /// non-positive quantity is a validation error.
    async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CommerceError>;

    /// Overwrite the quantity on an existing line.
    ///
    /// Quantities below one are rejected without touching the row. The line
    /// is addressed by id alone; the caller is not required to own it.
    async fn update_cart_line(
        &self,
        cart_id: CartLineId,
        quantity: i64,
    ) -> Result<(), CommerceError>;

    /// Delete a line. The line is addressed by id alone.
    async fn remove_cart_line(&self, cart_id: CartLineId) -> Result<(), CommerceError>;

    // -- user shipping profile --

    /// The user's saved shipping snapshot; fields are empty strings until
    /// shipping has been set.
    async fn shipping_profile(&self, user_id: UserId) -> Result<ShippingProfile, CommerceError>;

    /// Persist validated shipping details onto the user's profile.
    async fn save_shipping_profile(
        &self,
        user_id: UserId,
        info: &ShippingInfo,
    ) -> Result<(), CommerceError>;

    // -- order placement --

    /// Atomically convert the user's cart into an order.
    ///
    /// In one transaction: read the cart lines under a write lock (so no
    /// concurrent mutation of those rows lands mid-placement), fail with
    /// [`CommerceError::EmptyCart`] if there are none, price them through
    /// the pricing engine, insert the order header and one detail row per
    /// line with price snapshots, and delete the cart lines. Any failure
    /// rolls the whole transaction back; no partial order or half-cleared
    /// cart is ever observable.
    ///
    /// Placement does not change product stock and writes no ledger entry.
    async fn place_order(
        &self,
        user_id: UserId,
        payment_method: PaymentMethod,
    ) -> Result<PlacedOrder, CommerceError>;

    // -- orders --

    /// The user's orders, most recent first.
    async fn orders(&self, user_id: UserId) -> Result<Vec<Order>, CommerceError>;

    /// One of the user's orders with its detail lines.
    async fn order(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<(Order, Vec<OrderDetail>)>, CommerceError>;

    /// Apply a status transition, enforcing the order status state machine.
    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), CommerceError>;

    // -- inventory ledger --

    /// Append one audit row. Entries are never updated or deleted.
    async fn record_inventory_change(
        &self,
        product_id: ProductId,
        change_type: ChangeType,
        quantity_changed: i64,
        remarks: Option<&str>,
    ) -> Result<InventoryLogEntry, CommerceError>;

    /// Atomically apply a stock delta and append the matching audit row.
    ///
    /// A removal that would take stock below zero is rejected and nothing
    /// is written.
    async fn adjust_stock(
        &self,
        adjustment: &StockAdjustment,
    ) -> Result<InventoryLogEntry, CommerceError>;

    /// The full audit trail, oldest first.
    async fn inventory_logs(&self) -> Result<Vec<InventoryLogEntry>, CommerceError>;

    /// One audit row.
    async fn inventory_log(
        &self,
        log_id: LogEntryId,
    ) -> Result<Option<InventoryLogEntry>, CommerceError>;
}
