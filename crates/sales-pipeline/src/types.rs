//! Record and result types shared across the pipeline stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of the raw extract, exactly as read from the tabular source.
///
/// Every field is loosely typed; coercion and validation happen in the
/// cleaning stage. Empty cells deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

/// A validated, type-normalized sales row eligible for persistence.
///
/// Invariants: the date parsed successfully, the price is never null
/// (possibly a substituted 0.0), the quantity is an integer, and
/// `total_amount == quantity as f64 * price`.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub order_date: NaiveDate,
    pub product: String,
    pub customer_id: String,
    pub quantity: i64,
    pub price: f64,
    pub total_amount: f64,
}

/// The product with the highest summed quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product: String,
    pub units: i64,
}

/// The customer with the highest summed spend, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSpend {
    pub customer_id: String,
    pub spend: f64,
}

/// The three aggregate projections over the materialized table.
///
/// Each is `None` when the table has no rows; absence is a defined state,
/// not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_revenue: Option<f64>,
    pub top_product: Option<ProductSales>,
    pub top_customer: Option<CustomerSpend>,
}

/// Result of a full pipeline run, for operator visibility.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Raw rows read from the extract.
    pub rows_ingested: usize,
    /// Clean rows materialized into the store.
    pub rows_retained: usize,
    /// Rows dropped because the order date failed to parse.
    pub dropped_invalid_date: usize,
    /// Rows whose price was substituted with 0.0.
    pub defaulted_prices: usize,
    /// Rows dropped for a missing price (strict price policy only).
    pub dropped_missing_price: usize,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    pub database_path: PathBuf,
    pub report_path: PathBuf,
    pub summary: SalesSummary,
}
