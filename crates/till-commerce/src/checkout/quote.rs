//! Review quotes.

use crate::checkout::ShippingProfile;
use crate::money::Money;
use crate::order::PaymentMethod;
use crate::pricing::LinePricing;
use serde::{Deserialize, Serialize};

/// Customer details attached to a quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteCustomer {
    /// Recipient name, empty until shipping is set.
    pub full_name: String,
    /// Delivery address, empty until shipping is set.
    pub address: String,
    /// Contact number, empty until shipping is set.
    pub contact_number: String,
    /// Payment method (always COD).
    pub payment_method: PaymentMethod,
}

impl QuoteCustomer {
    pub fn from_profile(profile: ShippingProfile, payment_method: PaymentMethod) -> Self {
        Self {
            full_name: profile.full_name,
            address: profile.address,
            contact_number: profile.contact_number,
            payment_method,
        }
    }
}

/// The read-only summary shown before order placement.
///
/// A quote mutates nothing; two reviews without an intervening cart change
/// produce identical quotes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    /// Shipping snapshot plus payment method.
    pub customer: QuoteCustomer,
    /// Priced cart lines.
    pub items: Vec<LinePricing>,
    /// Cart total.
    pub total_amount: Money,
}
