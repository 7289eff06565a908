//! Inventory ledger types.
//!
//! The ledger is an append-only audit trail of stock changes. Entries are
//! never updated or deleted once written.

use crate::error::CommerceError;
use crate::ids::{LogEntryId, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    /// Stock added (restock, correction upward).
    #[serde(rename = "ADD")]
    Add,
    /// Stock removed (shrinkage, correction downward).
    #[serde(rename = "REMOVE")]
    Remove,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Add => "ADD",
            ChangeType::Remove => "REMOVE",
        }
    }

    /// Parse a stored change type string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADD" => Some(ChangeType::Add),
            "REMOVE" => Some(ChangeType::Remove),
            _ => None,
        }
    }

    /// The signed stock delta for a quantity changed in this direction.
    pub fn signed_delta(&self, quantity: i64) -> i64 {
        match self {
            ChangeType::Add => quantity,
            ChangeType::Remove => -quantity,
        }
    }
}

/// One immutable row in the inventory audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryLogEntry {
    /// Unique entry identifier.
    pub log_id: LogEntryId,
    /// Product whose stock changed.
    pub product_id: ProductId,
    /// When the change was recorded.
    pub log_date: DateTime<Utc>,
    /// Direction of the change.
    pub change_type: ChangeType,
    /// Quantity affected, always >= 1.
    pub quantity_changed: i64,
    /// Free-form notes.
    pub remarks: Option<String>,
}

/// A requested stock adjustment: a delta to apply plus the log entry
/// describing it, written atomically by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockAdjustment {
    /// Product to adjust.
    pub product_id: ProductId,
    /// Direction of the change.
    pub change_type: ChangeType,
    /// Quantity to add or remove.
    pub quantity: i64,
    /// Free-form notes.
    pub remarks: Option<String>,
}

impl StockAdjustment {
    /// Validate the adjustment quantity.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.quantity < 1 {
            return Err(CommerceError::Validation(format!(
                "adjustment quantity must be a positive integer, got {}",
                self.quantity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_type_round_trip() {
        assert_eq!(ChangeType::parse("ADD"), Some(ChangeType::Add));
        assert_eq!(ChangeType::parse("REMOVE"), Some(ChangeType::Remove));
        assert_eq!(ChangeType::parse("add"), None);
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(ChangeType::Add.signed_delta(5), 5);
        assert_eq!(ChangeType::Remove.signed_delta(5), -5);
    }

    #[test]
    fn test_adjustment_validation() {
        let mut adj = StockAdjustment {
            product_id: ProductId::new(1),
            change_type: ChangeType::Add,
            quantity: 10,
            remarks: None,
        };
        assert!(adj.validate().is_ok());
        adj.quantity = 0;
        assert!(adj.validate().is_err());
    }
}
