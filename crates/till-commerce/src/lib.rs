//! Checkout and inventory domain types and logic for Till.
//!
//! This crate holds the pure core of the system:
//!
//! - **Catalog**: product display data and stock
//! - **Cart**: cart lines with merge-add semantics
//! - **Pricing**: the single source of truth for line and cart totals
//! - **Checkout**: shipping, quotes, and the order-placement workflow
//! - **Inventory**: the append-only stock-change ledger
//! - **Store**: the [`store::CommerceStore`] trait storage adapters implement
//!
//! # Example
//!
//! ```rust,ignore
//! use till_commerce::prelude::*;
//!
//! let checkout = Checkout::new(store.clone());
//! checkout
//!     .set_shipping(user_id, "Ada Lovelace", "12 Analytical Way", "0123456789")
//!     .await?;
//! let quote = checkout.review(user_id).await?;
//! let placed = checkout.place_order(user_id).await?;
//! println!("order {} for {}", placed.order_id, placed.total_amount);
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ids;
pub mod inventory;
pub mod money;
pub mod order;
pub mod pricing;
pub mod store;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::Product;

    // Cart
    pub use crate::cart::CartLine;
    pub use crate::pricing::{CartPricing, LinePricing};

    // Checkout
    pub use crate::checkout::{Checkout, Quote, QuoteCustomer, ShippingInfo, ShippingProfile};
    pub use crate::order::{Order, OrderDetail, OrderStatus, PaymentMethod, PlacedOrder};

    // Inventory
    pub use crate::inventory::{ChangeType, InventoryLogEntry, StockAdjustment};

    // Storage seam
    pub use crate::store::CommerceStore;
}
