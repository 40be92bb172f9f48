//! Row ingestion: reads the raw extract into an ordered sequence of
//! [`RawRecord`]s.
//!
//! The ingestor is deliberately thin. It validates the header and hands
//! loosely typed rows to the cleaning stage; all coercion lives there.

use crate::error::{PipelineError, Result};
use crate::types::RawRecord;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Columns the raw extract must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 5] =
    ["order_date", "product", "customer_id", "quantity", "price"];

/// Reads raw records from a CSV source.
pub struct CsvIngestor;

impl CsvIngestor {
    /// Read the extract at `path`, preserving row order.
    pub fn read_path(path: &Path) -> Result<Vec<RawRecord>> {
        let file = std::fs::File::open(path)?;
        Self::read_from(file)
    }

    /// Read raw records from any CSV reader.
    ///
    /// Fails on a missing required column or a malformed record; a
    /// malformed source is fatal before cleaning starts.
    pub fn read_from<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(PipelineError::MissingColumn(required.to_string()));
            }
        }

        let mut records = Vec::new();
        for row in rdr.deserialize::<RawRecord>() {
            records.push(row?);
        }

        debug!("Ingested {} raw rows", records.len());
        Ok(records)
    }
}
