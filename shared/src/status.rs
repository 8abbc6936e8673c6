//! Derived stock/expiry status rules
//!
//! Two independent status families: stock level and expiry. They are
//! additive — a row carries one badge of each family — and the low-stock
//! threshold comparison is inclusive. Statuses are computed per query or
//! render pass from the current clock, never cached.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Low-stock threshold applied when a product carries none of its own.
pub const DEFAULT_MINIMUM_STOCK_THRESHOLD: u32 = 10;

/// Width of the "expiring soon" window, in days. The window starts at
/// today (inclusive) and ends at today + window (exclusive).
pub const EXPIRING_SOON_WINDOW_DAYS: u64 = 30;

/// Stock level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

/// Expiry classification
///
/// `Valid` renders no badge; only `Expired` and `ExpiringSoon` are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    Valid,
}

impl ExpiryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Valid => "Valid",
        }
    }
}

/// Classify a stock quantity against a threshold.
///
/// Quantity equal to the threshold counts as low stock (inclusive bound).
pub fn stock_status(quantity: u32, threshold: Option<u32>) -> StockStatus {
    let threshold = threshold.unwrap_or(DEFAULT_MINIMUM_STOCK_THRESHOLD);
    if quantity == 0 {
        StockStatus::OutOfStock
    } else if quantity <= threshold {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Classify an expiry date relative to `today`.
///
/// A product expiring exactly today is not yet expired; a product expiring
/// exactly at the window end is not expiring-soon (exclusive upper bound).
pub fn expiry_status(expiry: NaiveDate, today: NaiveDate) -> ExpiryStatus {
    if expiry < today {
        ExpiryStatus::Expired
    } else if expiry < today + Days::new(EXPIRING_SOON_WINDOW_DAYS) {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Valid
    }
}
