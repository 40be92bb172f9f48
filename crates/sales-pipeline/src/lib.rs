//! Sales ETL Pipeline Library
//!
//! A one-shot batch pipeline for raw sales extracts: clean and
//! type-normalize the rows, materialize them into SQLite with full-replace
//! semantics, compute three summary aggregates, and write a fixed-layout
//! text report.
//!
//! # Overview
//!
//! The stages run strictly left to right, once per run:
//!
//! - **Ingestion**: read the CSV extract into loosely typed [`RawRecord`]s
//! - **Cleaning**: parse dates (bad date drops the row), default or drop
//!   missing prices per [`PriceImputation`], coerce quantities (bad
//!   quantity aborts the run), derive `total_amount`
//! - **Store**: replace the entire `sales` table with the clean set
//! - **Aggregation**: total revenue, top product by units, top customer by
//!   spend — each present or absent, with first-seen tie-breaks
//! - **Report**: render the four fixed sections, overwriting the prior file
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sales_pipeline::{Pipeline, PipelineConfig, PriceImputation};
//!
//! let config = PipelineConfig::builder()
//!     .input_path("data/raw_sales_data.csv")
//!     .database_path("database/sales.db")
//!     .report_path("reports/summary_report.txt")
//!     .price_imputation(PriceImputation::Zero)
//!     .build()?;
//!
//! let summary = Pipeline::new(config)?.run()?;
//! println!("Retained {} of {} rows", summary.rows_retained, summary.rows_ingested);
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod types;

// Re-exports for convenient access
pub use cleaner::{CleaningOutcome, RecordCleaner};
pub use config::{
    ConfigValidationError, PipelineConfig, PipelineConfigBuilder, PriceImputation,
};
pub use error::{PipelineError, Result as PipelineResult, ResultExt};
pub use ingest::CsvIngestor;
pub use pipeline::Pipeline;
pub use report::{NO_DATA_MARKER, ReportGenerator};
pub use store::SalesStore;
pub use types::{
    CleanRecord, CustomerSpend, ProductSales, RawRecord, RunSummary, SalesSummary,
};
