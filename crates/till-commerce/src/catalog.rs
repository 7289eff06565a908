//! Product catalog types.
//!
//! The catalog is owned by catalog management; this core reads product
//! display data and mutates stock only through inventory adjustments.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub product_id: ProductId,
    /// Display name.
    pub name: String,
    /// Category label, if any.
    pub category: Option<String>,
    /// Current unit price.
    pub price: Money,
    /// Units on hand.
    pub stock_quantity: i64,
    /// Image reference.
    pub image_uri: Option<String>,
}

impl Product {
    /// Check whether the product has any stock left.
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_stock() {
        let mut p = Product {
            product_id: ProductId::new(1),
            name: "Test".into(),
            category: None,
            price: Money::from_cents(1000),
            stock_quantity: 3,
            image_uri: None,
        };
        assert!(p.in_stock());
        p.stock_quantity = 0;
        assert!(!p.in_stock());
    }
}
