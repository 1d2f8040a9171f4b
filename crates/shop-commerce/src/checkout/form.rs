//! Checkout form input and validation.

use crate::checkout::{DeliveryZone, UnitSize};
use crate::validation::ValidationErrors;
use serde::{Deserialize, Serialize};

/// Minimum digits in a customer phone number.
pub const MIN_PHONE_DIGITS: usize = 11;
/// Maximum digits in a customer phone number (with country code).
pub const MAX_PHONE_DIGITS: usize = 14;

/// Raw input collected by the order checkout modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub quantity: u32,
    pub unit_size: UnitSize,
    pub delivery_zone: DeliveryZone,
}

impl CheckoutForm {
    /// Check every field, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.customer_name.trim().is_empty() {
            errors.add("customerName", "Name is required");
        }

        match phone_digits(&self.phone) {
            None => errors.add("phone", "Phone number may only contain digits, spaces, '+' and '-'"),
            Some(n) if n < MIN_PHONE_DIGITS => errors.add("phone", "Phone number is too short"),
            Some(n) if n > MAX_PHONE_DIGITS => errors.add("phone", "Phone number is too long"),
            Some(_) => {}
        }

        if self.address.trim().is_empty() {
            errors.add("address", "Address is required");
        }

        if self.quantity < 1 {
            errors.add("quantity", "Quantity must be at least 1");
        }

        errors.into_result()
    }
}

/// Count the digits in a phone number, or `None` if it has stray characters.
fn phone_digits(phone: &str) -> Option<usize> {
    let mut digits = 0;
    for c in phone.trim().chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '+' => {}
            _ => return None,
        }
    }
    Some(digits)
}
