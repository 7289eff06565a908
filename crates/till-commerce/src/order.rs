//! Order types.

use crate::error::CommerceError;
use crate::ids::{OrderDetailId, OrderId, ProductId, UserId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered and settled.
    Completed,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse a stored status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(OrderStatus::Pending),
            "Processing" => Some(OrderStatus::Processing),
            "Shipped" => Some(OrderStatus::Shipped),
            "Completed" => Some(OrderStatus::Completed),
            "Cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Check whether a transition to `next` is allowed.
    ///
    /// Orders move Pending -> Processing -> Shipped -> Completed; any
    /// non-terminal order can be cancelled.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (*self, next),
            (OrderStatus::Pending, OrderStatus::Processing)
                | (OrderStatus::Processing, OrderStatus::Shipped)
                | (OrderStatus::Shipped, OrderStatus::Completed)
                | (
                    OrderStatus::Pending | OrderStatus::Processing | OrderStatus::Shipped,
                    OrderStatus::Cancelled,
                )
        )
    }

    /// Validate a transition, returning the error the API surfaces.
    pub fn transition_to(&self, next: OrderStatus) -> Result<OrderStatus, CommerceError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CommerceError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

/// Payment method.
///
/// Payment is settled as a fixed "due on delivery" placeholder; no other
/// method exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    #[serde(rename = "COD")]
    Cod,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "COD",
        }
    }

    /// Parse a stored payment method string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "COD" => Some(PaymentMethod::Cod),
            _ => None,
        }
    }
}

/// An order header.
///
/// Immutable after creation except for status transitions; `total_amount`
/// equals the sum of its detail subtotals at creation time and is never
/// edited afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub order_id: OrderId,
    /// Ordering user.
    pub user_id: UserId,
    /// Placement timestamp.
    pub order_date: DateTime<Utc>,
    /// Sum of detail subtotals at placement time.
    pub total_amount: Money,
    /// Current status.
    pub status: OrderStatus,
    /// Payment method.
    pub payment_method: PaymentMethod,
}

/// One line item within an order, with a price snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDetail {
    /// Unique detail identifier.
    pub order_detail_id: OrderDetailId,
    /// Owning order.
    pub order_id: OrderId,
    /// Product ordered.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: i64,
    /// `unit_price_at_purchase * quantity`, immune to later price changes.
    pub subtotal: Money,
}

/// Result of a successful order placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedOrder {
    /// The generated order ID.
    pub order_id: OrderId,
    /// Total charged.
    pub total_amount: Money,
    /// Payment method (always COD).
    pub payment_method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(OrderStatus::parse("Refunded"), None);
    }

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));

        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_transition_error() {
        let err = OrderStatus::Completed
            .transition_to(OrderStatus::Pending)
            .unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InvalidStatusTransition { .. }
        ));
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn test_payment_method() {
        assert_eq!(PaymentMethod::Cod.as_str(), "COD");
        assert_eq!(PaymentMethod::parse("COD"), Some(PaymentMethod::Cod));
        assert_eq!(PaymentMethod::parse("CARD"), None);
    }
}
