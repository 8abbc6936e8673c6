//! Product Model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::status::{self, ExpiryStatus, StockStatus};
use crate::validation::positive_price;

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price in currency units
    pub price: Decimal,
    pub stock_quantity: u32,
    /// Category name (free-form, populated from GET /categories)
    pub category: String,
    pub supplier: String,
    /// ISO-8601 calendar date on the wire
    pub expiry_date: NaiveDate,
    /// Per-product low-stock threshold; process default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_stock_threshold: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Stock status derived from quantity and the effective threshold.
    pub fn stock_status(&self) -> StockStatus {
        status::stock_status(self.stock_quantity, self.minimum_stock_threshold)
    }

    /// Expiry status relative to `today`. Computed per render pass,
    /// never stored.
    pub fn expiry_status(&self, today: NaiveDate) -> ExpiryStatus {
        status::expiry_status(self.expiry_date, today)
    }
}

/// Create product payload
///
/// `id`, `createdAt` and `updatedAt` are server-assigned and never part of
/// an outgoing body. `validate()` must pass before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 100, message = "name is required (max 100 characters)"))]
    pub name: String,
    #[validate(length(max = 500, message = "description exceeds 500 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = positive_price))]
    pub price: Decimal,
    pub stock_quantity: u32,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "supplier is required"))]
    pub supplier: String,
    pub expiry_date: NaiveDate,
    #[validate(range(min = 1, message = "threshold must be positive"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_stock_threshold: Option<u32>,
}

/// Update product payload (partial; absent fields are left unchanged)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 100, message = "name is required (max 100 characters)"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "description exceeds 500 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = positive_price))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
    #[validate(length(min = 1, message = "category is required"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[validate(length(min = 1, message = "supplier is required"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[validate(range(min = 1, message = "threshold must be positive"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_stock_threshold: Option<u32>,
}
