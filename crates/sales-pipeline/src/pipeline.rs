//! Pipeline orchestration: ingest → clean → materialize → aggregate → report.
//!
//! The five stages run strictly sequentially within one run. Any stage
//! failure propagates; there are no retries and no partial report. The
//! store connection is released before the report is written, so every
//! exit path, including failures, releases its resources.

use crate::cleaner::RecordCleaner;
use crate::config::PipelineConfig;
use crate::error::{Result, ResultExt};
use crate::ingest::CsvIngestor;
use crate::report::ReportGenerator;
use crate::store::SalesStore;
use crate::types::{RawRecord, RunSummary, SalesSummary};
use std::time::Instant;
use tracing::{debug, info};

/// The one-shot batch pipeline. Owns nothing but its configuration; every
/// run opens and releases its own resources.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline, reading the raw extract from
    /// `config.input_path`.
    pub fn run(&self) -> Result<RunSummary> {
        info!("Loading raw extract from {}", self.config.input_path.display());
        let raw = CsvIngestor::read_path(&self.config.input_path)?;
        self.process_records(raw)
    }

    /// Run every stage after ingestion on an already-loaded raw sequence.
    pub fn process_records(&self, raw: Vec<RawRecord>) -> Result<RunSummary> {
        let start = Instant::now();
        let rows_ingested = raw.len();

        info!("Step 1: Cleaning {} raw rows...", rows_ingested);
        let cleaner = RecordCleaner::new(self.config.price_imputation);
        let outcome = cleaner.clean(&raw)?;
        for rec in outcome.records.iter().take(self.config.preview_rows) {
            debug!("head: {:?}", rec);
        }

        info!(
            "Step 2: Materializing into {}...",
            self.config.database_path.display()
        );
        let summary = {
            let mut store = SalesStore::open(&self.config.database_path, &self.config.table_name)
                .context("opening sales database")?;
            store.materialize(&outcome.records)?;
            info!(
                "Table '{}' now holds {} rows",
                self.config.table_name,
                store.count_rows()?
            );

            info!("Step 3: Computing aggregates...");
            SalesSummary {
                total_revenue: store.total_revenue()?,
                top_product: store.top_product()?,
                top_customer: store.top_customer()?,
            }
        }; // store connection released before the report is written

        info!("Step 4: Writing report...");
        let reporter = ReportGenerator::new(
            self.config.report_path.clone(),
            self.config.currency.clone(),
        );
        let report_path = reporter.write(&summary).context("writing summary report")?;

        info!("Pipeline executed successfully");
        Ok(RunSummary {
            rows_ingested,
            rows_retained: outcome.records.len(),
            dropped_invalid_date: outcome.dropped_invalid_date,
            defaulted_prices: outcome.defaulted_prices,
            dropped_missing_price: outcome.dropped_missing_price,
            duration_ms: start.elapsed().as_millis() as u64,
            database_path: self.config.database_path.clone(),
            report_path,
            summary,
        })
    }
}
