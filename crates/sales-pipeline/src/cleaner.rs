//! Cleaning stage: type-normalizes raw rows into [`CleanRecord`]s.
//!
//! The three fields get three different null policies, and the asymmetry is
//! intentional:
//!
//! - `order_date`: unparseable or missing → the row is dropped
//! - `price`: unparseable or missing → substituted with 0.0 (or the row is
//!   dropped under the strict [`PriceImputation::Drop`] strategy)
//! - `quantity`: unparseable or missing on a retained row → the run aborts
//!
//! Rows dropped by the date (or strict price) rule never reach the quantity
//! check, so garbage quantities on discarded rows cannot abort the run.

use crate::config::PriceImputation;
use crate::error::{PipelineError, Result};
use crate::types::{CleanRecord, RawRecord};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

/// Characters commonly used in numeric formatting that are stripped before
/// parsing.
const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Date-only formats accepted for `order_date`.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%m/%d/%Y"];

/// Datetime formats accepted for `order_date`; the time part is discarded.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Output of the cleaning stage: the retained records plus per-rule counts
/// for operator visibility. The counts are diagnostic only; they are not
/// part of the persisted contract.
#[derive(Debug, Clone, Default)]
pub struct CleaningOutcome {
    pub records: Vec<CleanRecord>,
    pub dropped_invalid_date: usize,
    pub defaulted_prices: usize,
    pub dropped_missing_price: usize,
}

/// Applies the cleaning rules to a raw row sequence, preserving input order.
pub struct RecordCleaner {
    price_imputation: PriceImputation,
}

impl RecordCleaner {
    pub fn new(price_imputation: PriceImputation) -> Self {
        Self { price_imputation }
    }

    /// Clean the raw sequence into validated records.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidQuantity`] if a retained row carries
    /// a quantity that cannot be coerced to an integer. `row` in the error
    /// is the 1-based position within the input sequence.
    pub fn clean(&self, raw: &[RawRecord]) -> Result<CleaningOutcome> {
        let mut outcome = CleaningOutcome::default();

        for (idx, row) in raw.iter().enumerate() {
            // Date first: an unparseable date discards the row outright.
            let Some(order_date) = row.order_date.as_deref().and_then(parse_order_date) else {
                outcome.dropped_invalid_date += 1;
                continue;
            };

            let price = match row.price.as_deref().and_then(parse_price) {
                Some(p) => p,
                None => match self.price_imputation {
                    PriceImputation::Zero => {
                        outcome.defaulted_prices += 1;
                        0.0
                    }
                    PriceImputation::Drop => {
                        outcome.dropped_missing_price += 1;
                        continue;
                    }
                },
            };

            let quantity = coerce_quantity(row.quantity.as_deref()).ok_or_else(|| {
                PipelineError::InvalidQuantity {
                    row: idx + 1,
                    value: row.quantity.clone().unwrap_or_default(),
                }
            })?;

            outcome.records.push(CleanRecord {
                order_date,
                product: row.product.clone().unwrap_or_default(),
                customer_id: row.customer_id.clone().unwrap_or_default(),
                quantity,
                price,
                total_amount: quantity as f64 * price,
            });
        }

        info!("Rows after cleaning: {}", outcome.records.len());
        Ok(outcome)
    }
}

/// Parse an order date against the accepted format list.
pub fn parse_order_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Strip common numeric formatting (currency symbols, thousands separators,
/// whitespace) before parsing.
fn clean_numeric_string(s: &str) -> String {
    let mut result = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        result = result.replace(c, "");
    }
    result
}

/// Parse a price value. `None` means missing or unparseable; the caller
/// decides between substitution and dropping.
pub fn parse_price(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a quantity to an integer. Integer strings parse directly; float
/// strings truncate toward zero, matching integer coercion on a
/// float-typed column.
pub fn coerce_quantity(s: Option<&str>) -> Option<i64> {
    let cleaned = clean_numeric_string(s?);
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(v) = cleaned.parse::<i64>() {
        return Some(v);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v as i64)
}
