//! Shipping information.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Validated shipping details, persisted onto the user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingInfo {
    /// Recipient name.
    pub full_name: String,
    /// Delivery address.
    pub address: String,
    /// Contact phone number.
    pub contact_number: String,
}

impl ShippingInfo {
    /// Build shipping info, rejecting any blank field.
    pub fn new(
        full_name: impl Into<String>,
        address: impl Into<String>,
        contact_number: impl Into<String>,
    ) -> Result<Self, CommerceError> {
        let info = Self {
            full_name: full_name.into().trim().to_string(),
            address: address.into().trim().to_string(),
            contact_number: contact_number.into().trim().to_string(),
        };
        for (field, value) in [
            ("full_name", &info.full_name),
            ("address", &info.address),
            ("contact_number", &info.contact_number),
        ] {
            if value.is_empty() {
                return Err(CommerceError::Validation(format!(
                    "missing shipping field: {field}"
                )));
            }
        }
        Ok(info)
    }
}

/// The shipping snapshot read back from a user's profile.
///
/// Fields are empty strings until the user has set shipping info; a missing
/// snapshot never blocks review.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShippingProfile {
    pub full_name: String,
    pub address: String,
    pub contact_number: String,
}

impl From<ShippingInfo> for ShippingProfile {
    fn from(info: ShippingInfo) -> Self {
        Self {
            full_name: info.full_name,
            address: info.address,
            contact_number: info.contact_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_shipping_info() {
        let info = ShippingInfo::new("Ada Lovelace", "12 Analytical Way", "0123456789").unwrap();
        assert_eq!(info.full_name, "Ada Lovelace");
    }

    #[test]
    fn test_trims_whitespace() {
        let info = ShippingInfo::new("  Ada  ", " 12 Analytical Way ", " 0123 ").unwrap();
        assert_eq!(info.full_name, "Ada");
        assert_eq!(info.address, "12 Analytical Way");
    }

    #[test]
    fn test_rejects_blank_fields() {
        assert!(ShippingInfo::new("", "addr", "123").is_err());
        assert!(ShippingInfo::new("name", "   ", "123").is_err());
        assert!(ShippingInfo::new("name", "addr", "").is_err());
    }
}
