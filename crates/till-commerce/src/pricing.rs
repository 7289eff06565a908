//! Cart pricing calculations.
//!
//! The single source of truth for totals: the cart view, the review quote,
//! and order placement all price through this module. All arithmetic is in
//! integer cents, so the cart total equals the sum of line totals exactly.

use crate::cart::CartLine;
use crate::error::CommerceError;
use crate::ids::{CartLineId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a single cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    /// Cart line ID.
    pub cart_id: CartLineId,
    /// Product ID.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Line total (`price * quantity`).
    pub total_price: Money,
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Per-line breakdown.
    pub lines: Vec<LinePricing>,
    /// Sum of line totals.
    pub total: Money,
}

/// Compute a line total.
pub fn line_total(unit_price: Money, quantity: i64) -> Result<Money, CommerceError> {
    unit_price
        .checked_mul(quantity)
        .ok_or(CommerceError::Overflow)
}

/// Price a cart: per-line totals plus the cart total.
pub fn price_cart(lines: &[CartLine]) -> Result<CartPricing, CommerceError> {
    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        priced.push(LinePricing {
            cart_id: line.cart_id,
            product_id: line.product_id,
            name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
            total_price: line_total(line.price, line.quantity)?,
        });
    }
    let total = Money::try_sum(priced.iter().map(|l| l.total_price)).ok_or(CommerceError::Overflow)?;
    Ok(CartPricing {
        lines: priced,
        total,
    })
}
