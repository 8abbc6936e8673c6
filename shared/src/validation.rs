//! Client-side validation helpers
//!
//! Rules the `validator` derive cannot express, plus flattening of
//! `ValidationErrors` into per-field messages for inline display.
//! Validation runs before submission; a payload that fails never reaches
//! the network.

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

/// A single field-level validation failure, ready for inline display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Price must be strictly positive on submission.
pub fn positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        let mut err = ValidationError::new("positive_price");
        err.message = Some(Cow::from("price must be greater than zero"));
        return Err(err);
    }
    Ok(())
}

/// Flatten `ValidationErrors` into one message per failing field,
/// preserving declaration order as reported by the derive.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, list) in errors.field_errors() {
        for err in list {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("invalid value ({})", err.code));
            out.push(FieldError {
                field: field.to_string(),
                message,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductCreate;
    use chrono::NaiveDate;
    use validator::Validate;

    #[test]
    fn positive_price_rejects_zero_and_negative() {
        assert!(positive_price(&Decimal::ZERO).is_err());
        assert!(positive_price(&Decimal::new(-100, 2)).is_err());
        assert!(positive_price(&Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn field_errors_carry_messages() {
        let draft = ProductCreate {
            name: String::new(),
            description: None,
            price: Decimal::ZERO,
            stock_quantity: 0,
            category: String::new(),
            supplier: "Acme".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            minimum_stock_threshold: None,
        };
        let errors = draft.validate().unwrap_err();
        let flat = field_errors(&errors);

        let fields: Vec<_> = flat.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"price"));
        assert!(fields.contains(&"category"));
        assert!(!fields.contains(&"supplier"));
        assert!(flat.iter().all(|e| !e.message.is_empty()));
    }
}
