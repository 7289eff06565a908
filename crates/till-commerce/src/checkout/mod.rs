//! Checkout module.
//!
//! Contains the shipping types, review quote, and the orchestrator that
//! composes cart, pricing, and order writing into one workflow.

mod orchestrator;
mod quote;
mod shipping;

pub use orchestrator::Checkout;
pub use quote::{Quote, QuoteCustomer};
pub use shipping::{ShippingInfo, ShippingProfile};
