//! Cart line types and validation.
//!
//! A cart holds at most one line per `(user, product)` pair; repeat adds
//! merge into the existing line. The uniqueness itself is enforced by the
//! storage layer, which is the only place the merge can be made atomic.

use crate::error::CommerceError;
use crate::ids::{CartLineId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A cart line joined with its product's display data at read time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Unique line identifier.
    pub cart_id: CartLineId,
    /// Product in the line.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price as of the read.
    pub price: Money,
    /// Quantity, always >= 1.
    pub quantity: i64,
    /// Product image reference.
    pub image_uri: Option<String>,
}

/// Validate a requested line quantity.
///
/// Quantities below one are rejected; a line never stores zero.
pub fn validate_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity < 1 {
        return Err(CommerceError::Validation(format!(
            "quantity must be a positive integer, got {quantity}"
        )));
    }
    Ok(())
}
