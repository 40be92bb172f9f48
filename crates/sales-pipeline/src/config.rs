//! Configuration for the sales pipeline.
//!
//! One explicit config struct is passed into each stage; there is no
//! process-wide state. Built with the builder pattern for ergonomic setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Strategy for rows whose price is missing or unparseable.
///
/// The date rule is different on purpose: a bad date always drops the row,
/// a bad price never does under the default strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PriceImputation {
    /// Substitute 0.0 and keep the row (lenient, the default)
    #[default]
    Zero,
    /// Drop rows with a missing or unparseable price (strict)
    Drop,
}

/// Configuration for a pipeline run.
///
/// Use [`PipelineConfig::builder()`] to create a configuration with a
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use sales_pipeline::{PipelineConfig, PriceImputation};
///
/// let config = PipelineConfig::builder()
///     .input_path("data/raw_sales_data.csv")
///     .table_name("sales")
///     .price_imputation(PriceImputation::Zero)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Path to the raw sales extract (CSV).
    /// Default: "data/raw_sales_data.csv"
    pub input_path: PathBuf,

    /// Path of the SQLite database the cleaned rows are materialized into.
    /// Default: "database/sales.db"
    pub database_path: PathBuf,

    /// Path of the generated summary report. Overwritten on every run.
    /// Default: "reports/summary_report.txt"
    pub report_path: PathBuf,

    /// Name of the table holding the cleaned rows. Fully replaced each run.
    /// Default: "sales"
    pub table_name: String,

    /// Currency label used for monetary lines in the report.
    /// Default: "INR"
    pub currency: String,

    /// How rows with a missing or unparseable price are handled.
    /// Default: Zero
    pub price_imputation: PriceImputation,

    /// Number of cleaned rows logged at debug level as a head preview.
    /// Default: 5
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/raw_sales_data.csv"),
            database_path: PathBuf::from("database/sales.db"),
            report_path: PathBuf::from("reports/summary_report.txt"),
            table_name: "sales".to_string(),
            currency: "INR".to_string(),
            price_imputation: PriceImputation::default(),
            preview_rows: 5,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !is_bare_identifier(&self.table_name) {
            return Err(ConfigValidationError::InvalidTableName(
                self.table_name.clone(),
            ));
        }

        if self.currency.trim().is_empty() {
            return Err(ConfigValidationError::EmptyCurrency);
        }

        Ok(())
    }
}

/// The table name is interpolated into SQL statements, so it must be a bare
/// identifier rather than an arbitrary string.
fn is_bare_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid table name '{0}' (must be a bare SQL identifier)")]
    InvalidTableName(String),

    #[error("Currency label must not be empty")]
    EmptyCurrency,
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    input_path: Option<PathBuf>,
    database_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
    table_name: Option<String>,
    currency: Option<String>,
    price_imputation: Option<PriceImputation>,
    preview_rows: Option<usize>,
}

impl PipelineConfigBuilder {
    /// Set the path of the raw sales extract.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the path of the SQLite database.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Set the path of the generated report.
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Set the name of the materialized table.
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Set the currency label used in the report.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the strategy for rows with a missing or unparseable price.
    pub fn price_imputation(mut self, strategy: PriceImputation) -> Self {
        self.price_imputation = Some(strategy);
        self
    }

    /// Set the number of cleaned rows logged as a head preview.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            database_path: self.database_path.unwrap_or(defaults.database_path),
            report_path: self.report_path.unwrap_or(defaults.report_path),
            table_name: self.table_name.unwrap_or(defaults.table_name),
            currency: self.currency.unwrap_or(defaults.currency),
            price_imputation: self.price_imputation.unwrap_or_default(),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.table_name, "sales");
        assert_eq!(config.currency, "INR");
        assert_eq!(config.price_imputation, PriceImputation::Zero);
        assert_eq!(config.preview_rows, 5);
    }

    #[test]
    fn test_builder_defaults() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config.database_path, PathBuf::from("database/sales.db"));
        assert_eq!(config.report_path, PathBuf::from("reports/summary_report.txt"));
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .input_path("extract.csv")
            .database_path("out/sales.db")
            .table_name("sales_clean")
            .currency("EUR")
            .price_imputation(PriceImputation::Drop)
            .preview_rows(3)
            .build()
            .unwrap();

        assert_eq!(config.input_path, PathBuf::from("extract.csv"));
        assert_eq!(config.table_name, "sales_clean");
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.price_imputation, PriceImputation::Drop);
        assert_eq!(config.preview_rows, 3);
    }

    #[test]
    fn test_validation_rejects_bad_table_name() {
        for name in ["", "1sales", "sales;drop", "sales table", "sales-2024"] {
            let result = PipelineConfig::builder().table_name(name).build();
            assert!(
                matches!(result, Err(ConfigValidationError::InvalidTableName(_))),
                "table name {name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validation_accepts_identifier_table_names() {
        for name in ["sales", "_staging", "sales_2024"] {
            assert!(PipelineConfig::builder().table_name(name).build().is_ok());
        }
    }

    #[test]
    fn test_validation_rejects_empty_currency() {
        let result = PipelineConfig::builder().currency("  ").build();
        assert!(matches!(result, Err(ConfigValidationError::EmptyCurrency)));
    }

    #[test]
    fn test_config_serialization() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.table_name, deserialized.table_name);
        assert_eq!(config.price_imputation, deserialized.price_imputation);
    }

    #[test]
    fn test_pipeline_config_from_json() {
        let json = r#"{
            "input_path": "data/extract.csv",
            "database_path": "db/sales.db",
            "report_path": "out/report.txt",
            "table_name": "sales",
            "currency": "USD",
            "price_imputation": "Drop",
            "preview_rows": 10
        }"#;

        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.price_imputation, PriceImputation::Drop);
        assert_eq!(config.preview_rows, 10);
    }
}
