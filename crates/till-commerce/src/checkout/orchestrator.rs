//! Checkout orchestration.
//!
//! Drives the shipping -> payment -> review -> place sequence over a
//! [`CommerceStore`]. The sequence is a client-side convention: each
//! operation validates its own preconditions, so the steps carry no
//! persisted state between calls.

use crate::checkout::{Quote, QuoteCustomer, ShippingInfo};
use crate::error::CommerceError;
use crate::ids::UserId;
use crate::order::{PaymentMethod, PlacedOrder};
use crate::pricing;
use crate::store::CommerceStore;
use std::sync::Arc;
use tracing::{info, instrument};

/// The checkout workflow over a storage backend.
#[derive(Clone)]
pub struct Checkout {
    store: Arc<dyn CommerceStore>,
}

impl Checkout {
    pub fn new(store: Arc<dyn CommerceStore>) -> Self {
        Self { store }
    }

    /// Step 1: validate and persist shipping details on the user's profile.
    #[instrument(skip(self, full_name, address, contact_number))]
    pub async fn set_shipping(
        &self,
        user_id: UserId,
        full_name: &str,
        address: &str,
        contact_number: &str,
    ) -> Result<(), CommerceError> {
        let info = ShippingInfo::new(full_name, address, contact_number)?;
        self.store.save_shipping_profile(user_id, &info).await?;
        info!(user = %user_id, "shipping info saved");
        Ok(())
    }

    /// Step 2: select the payment method.
    ///
    /// Payment is a placeholder: whatever the client sends, the method
    /// resolves to cash on delivery. Never fails.
    pub fn set_payment(&self, _user_id: UserId) -> PaymentMethod {
        PaymentMethod::Cod
    }

    /// Step 3: produce the read-only order summary.
    ///
    /// Reads the cart (empty cart is an error), prices it, and joins the
    /// saved shipping snapshot, with empty strings when shipping was never
    /// set. Safe to call any number of times.
    #[instrument(skip(self))]
    pub async fn review(&self, user_id: UserId) -> Result<Quote, CommerceError> {
        let lines = self.store.cart(user_id).await?;
        if lines.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        let priced = pricing::price_cart(&lines)?;
        let profile = self.store.shipping_profile(user_id).await?;
        Ok(Quote {
            customer: QuoteCustomer::from_profile(profile, PaymentMethod::Cod),
            items: priced.lines,
            total_amount: priced.total,
        })
    }

    /// Step 4: convert the cart into an order.
    ///
    /// The storage backend re-reads the cart inside its transaction rather
    /// than trusting any previously returned quote, so placement never acts
    /// on stale lines. Order header, detail lines, and the cart delete all
    /// commit or roll back together.
    #[instrument(skip(self))]
    pub async fn place_order(&self, user_id: UserId) -> Result<PlacedOrder, CommerceError> {
        let placed = self.store.place_order(user_id, PaymentMethod::Cod).await?;
        info!(
            user = %user_id,
            order = %placed.order_id,
            total = %placed.total_amount,
            "order placed"
        );
        Ok(placed)
    }
}
