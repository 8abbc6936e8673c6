//! Filter specification and client-side predicates
//!
//! A `FilterSpec` is the set of user-chosen predicates narrowing the
//! displayed collection. All predicates are conjunctive; absent fields
//! impose no constraint. The `low_stock`/`expiring_soon` shortcuts route
//! the fetch to a dedicated server endpoint (see the client crate's
//! evaluator); everything else is applied locally by [`FilterSpec::matches`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::status::{ExpiryStatus, StockStatus};

/// Stock-status bucket filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockFilter {
    #[default]
    All,
    InStock,
    LowStock,
    OutOfStock,
}

impl StockFilter {
    pub fn accepts(&self, status: StockStatus) -> bool {
        match self {
            Self::All => true,
            Self::InStock => status == StockStatus::InStock,
            Self::LowStock => status == StockStatus::LowStock,
            Self::OutOfStock => status == StockStatus::OutOfStock,
        }
    }

    /// Cycle through the buckets (console hotkey).
    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::InStock,
            Self::InStock => Self::LowStock,
            Self::LowStock => Self::OutOfStock,
            Self::OutOfStock => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::InStock => "in stock",
            Self::LowStock => "low stock",
            Self::OutOfStock => "out of stock",
        }
    }
}

/// Expiry-status bucket filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryFilter {
    #[default]
    All,
    Expired,
    ExpiringSoon,
    Valid,
}

impl ExpiryFilter {
    pub fn accepts(&self, status: ExpiryStatus) -> bool {
        match self {
            Self::All => true,
            Self::Expired => status == ExpiryStatus::Expired,
            Self::ExpiringSoon => status == ExpiryStatus::ExpiringSoon,
            Self::Valid => status == ExpiryStatus::Valid,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Expired,
            Self::Expired => Self::ExpiringSoon,
            Self::ExpiringSoon => Self::Valid,
            Self::Valid => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Expired => "expired",
            Self::ExpiringSoon => "expiring soon",
            Self::Valid => "valid",
        }
    }
}

/// User-chosen predicates narrowing the product collection.
///
/// Held in transient console state; reset on explicit clear; never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Free-text search across name and description
    pub search: Option<String>,
    /// Category substring (case-insensitive)
    pub category: Option<String>,
    /// Supplier substring (case-insensitive)
    pub supplier: Option<String>,
    pub stock_status: StockFilter,
    pub expiry_status: ExpiryFilter,
    /// Fetch the server's dedicated low-stock endpoint exclusively
    pub low_stock: bool,
    /// Fetch the server's dedicated expiring endpoint exclusively
    pub expiring_soon: bool,
}

impl FilterSpec {
    /// True when no predicate constrains the collection.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reset every predicate.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Apply the client-side predicates to one product. The endpoint
    /// shortcuts are not evaluated here — they only select the fetch
    /// route. Conjunctive; order is irrelevant to the result.
    pub fn matches(&self, product: &Product, today: NaiveDate) -> bool {
        if let Some(category) = non_empty(&self.category) {
            if !contains_ci(&product.category, category) {
                return false;
            }
        }
        if let Some(supplier) = non_empty(&self.supplier) {
            if !contains_ci(&product.supplier, supplier) {
                return false;
            }
        }
        if let Some(term) = non_empty(&self.search) {
            let in_name = contains_ci(&product.name, term);
            let in_description = product
                .description
                .as_deref()
                .is_some_and(|d| contains_ci(d, term));
            if !in_name && !in_description {
                return false;
            }
        }
        if !self.stock_status.accepts(product.stock_status()) {
            return false;
        }
        if !self.expiry_status.accepts(product.expiry_status(today)) {
            return false;
        }
        true
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}
