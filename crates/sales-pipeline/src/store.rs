//! SQLite-backed store for the cleaned record set.
//!
//! Materialization has full-replace semantics: the table is dropped and
//! rebuilt inside one transaction, so a failed write never leaves a
//! partially visible mix of old and new rows. The three aggregate queries
//! are read-only projections over the materialized table.

use crate::error::Result;
use crate::types::{CleanRecord, CustomerSpend, ProductSales};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::debug;

/// A single named table holding the full clean record set.
pub struct SalesStore {
    conn: Connection,
    table: String,
}

impl SalesStore {
    /// Open (or create) the database at `path`.
    ///
    /// The table name must already be validated as a bare identifier; it is
    /// interpolated into SQL text.
    pub fn open(path: &Path, table: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Open an in-memory database, for tests.
    pub fn open_in_memory(table: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Replace the entire table content with `records`, in input order.
    ///
    /// Insertion order is preserved (rowid order), which the aggregate
    /// tie-breaks rely on.
    pub fn materialize(&mut self, records: &[CleanRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                 order_date   TEXT    NOT NULL,
                 product      TEXT    NOT NULL,
                 customer_id  TEXT    NOT NULL,
                 quantity     INTEGER NOT NULL,
                 price        REAL    NOT NULL,
                 total_amount REAL    NOT NULL
             );",
            table = self.table
        ))?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (order_date, product, customer_id, quantity, price, total_amount)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                self.table
            ))?;
            for rec in records {
                stmt.execute(params![
                    rec.order_date.format("%Y-%m-%d").to_string(),
                    rec.product,
                    rec.customer_id,
                    rec.quantity,
                    rec.price,
                    rec.total_amount,
                ])?;
            }
        }

        tx.commit()?;
        debug!("Materialized {} rows into '{}'", records.len(), self.table);
        Ok(())
    }

    /// Number of rows currently in the table.
    pub fn count_rows(&self) -> Result<i64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Sum of `total_amount` over all rows, rounded to 2 decimals.
    /// `None` when the table is empty.
    pub fn total_revenue(&self) -> Result<Option<f64>> {
        let revenue = self.conn.query_row(
            &format!(
                "SELECT ROUND(SUM(total_amount), 2) AS total_revenue FROM {}",
                self.table
            ),
            [],
            |row| row.get(0),
        )?;
        Ok(revenue)
    }

    /// The product with the highest summed quantity; ties go to the
    /// first-seen product. `None` when the table is empty.
    pub fn top_product(&self) -> Result<Option<ProductSales>> {
        let top = self
            .conn
            .query_row(
                &format!(
                    "SELECT product, SUM(quantity) AS total_sold
                     FROM {}
                     GROUP BY product
                     ORDER BY total_sold DESC, MIN(rowid) ASC
                     LIMIT 1",
                    self.table
                ),
                [],
                |row| {
                    Ok(ProductSales {
                        product: row.get(0)?,
                        units: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(top)
    }

    /// The customer with the highest summed spend, rounded to 2 decimals;
    /// same tie-break and absence rules as [`top_product`](Self::top_product).
    pub fn top_customer(&self) -> Result<Option<CustomerSpend>> {
        let top = self
            .conn
            .query_row(
                &format!(
                    "SELECT customer_id, ROUND(SUM(total_amount), 2) AS spend
                     FROM {}
                     GROUP BY customer_id
                     ORDER BY spend DESC, MIN(rowid) ASC
                     LIMIT 1",
                    self.table
                ),
                [],
                |row| {
                    Ok(CustomerSpend {
                        customer_id: row.get(0)?,
                        spend: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(date: (i32, u32, u32), product: &str, customer: &str, qty: i64, price: f64) -> CleanRecord {
        CleanRecord {
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            product: product.to_string(),
            customer_id: customer.to_string(),
            quantity: qty,
            price,
            total_amount: qty as f64 * price,
        }
    }

    fn scenario_records() -> Vec<CleanRecord> {
        vec![
            record((2024, 1, 5), "Widget", "C1", 2, 10.0),
            record((2024, 1, 6), "Widget", "C2", 1, 10.0),
        ]
    }

    #[test]
    fn test_materialize_and_count() {
        let mut store = SalesStore::open_in_memory("sales").unwrap();
        store.materialize(&scenario_records()).unwrap();
        assert_eq!(store.count_rows().unwrap(), 2);
    }

    #[test]
    fn test_materialize_replaces_prior_content() {
        let mut store = SalesStore::open_in_memory("sales").unwrap();
        store.materialize(&scenario_records()).unwrap();
        store
            .materialize(&[record((2024, 2, 1), "Gadget", "C3", 1, 5.0)])
            .unwrap();

        // Full replace, not append.
        assert_eq!(store.count_rows().unwrap(), 1);
        let top = store.top_product().unwrap().unwrap();
        assert_eq!(top.product, "Gadget");
    }

    #[test]
    fn test_aggregates_scenario() {
        let mut store = SalesStore::open_in_memory("sales").unwrap();
        store.materialize(&scenario_records()).unwrap();

        assert_eq!(store.total_revenue().unwrap(), Some(30.0));

        let product = store.top_product().unwrap().unwrap();
        assert_eq!(product.product, "Widget");
        assert_eq!(product.units, 3);

        let customer = store.top_customer().unwrap().unwrap();
        assert_eq!(customer.customer_id, "C1");
        assert_eq!(customer.spend, 20.0);
    }

    #[test]
    fn test_empty_table_yields_absent_aggregates() {
        let mut store = SalesStore::open_in_memory("sales").unwrap();
        store.materialize(&[]).unwrap();

        assert_eq!(store.count_rows().unwrap(), 0);
        assert_eq!(store.total_revenue().unwrap(), None);
        assert_eq!(store.top_product().unwrap(), None);
        assert_eq!(store.top_customer().unwrap(), None);
    }

    #[test]
    fn test_revenue_is_rounded_to_two_decimals() {
        let mut store = SalesStore::open_in_memory("sales").unwrap();
        store
            .materialize(&[
                record((2024, 1, 5), "Widget", "C1", 2, 10.002),
                record((2024, 1, 6), "Widget", "C2", 1, 10.0),
            ])
            .unwrap();

        // 20.004 + 10.0 rounds down to 30.0
        assert_eq!(store.total_revenue().unwrap(), Some(30.0));
    }

    #[test]
    fn test_tie_break_is_first_seen() {
        let mut store = SalesStore::open_in_memory("sales").unwrap();
        let records = vec![
            record((2024, 1, 5), "Beta", "C2", 3, 1.0),
            record((2024, 1, 6), "Alpha", "C1", 3, 1.0),
        ];
        store.materialize(&records).unwrap();

        // Both sum to 3 units; the first-seen product wins.
        let top = store.top_product().unwrap().unwrap();
        assert_eq!(top.product, "Beta");

        // Same input, same winner on re-materialization.
        store.materialize(&records).unwrap();
        assert_eq!(store.top_product().unwrap().unwrap().product, "Beta");
    }

    #[test]
    fn test_top_customer_tie_break_is_first_seen() {
        let mut store = SalesStore::open_in_memory("sales").unwrap();
        store
            .materialize(&[
                record((2024, 1, 5), "Widget", "C9", 1, 10.0),
                record((2024, 1, 6), "Widget", "C1", 1, 10.0),
            ])
            .unwrap();

        let top = store.top_customer().unwrap().unwrap();
        assert_eq!(top.customer_id, "C9");
        assert_eq!(top.spend, 10.0);
    }

    #[test]
    fn test_custom_table_name() {
        let mut store = SalesStore::open_in_memory("sales_staging").unwrap();
        store.materialize(&scenario_records()).unwrap();
        assert_eq!(store.count_rows().unwrap(), 2);
    }
}
