//! Custom error types for the sales pipeline.
//!
//! One `thiserror` hierarchy covers all five stages. Recoverable cleaning
//! conditions (missing price, unparseable date) never become errors; they are
//! handled inline by the cleaning stage and only counted.

use thiserror::Error;

/// The main error type for the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required column is absent from the input header.
    #[error("Required column '{0}' not found in input")]
    MissingColumn(String),

    /// The raw extract could not be read or parsed.
    #[error("Failed to read input: {0}")]
    Ingest(#[from] csv::Error),

    /// A retained row carries a quantity that cannot be coerced to an
    /// integer. There is no fallback for quantity; the whole run aborts.
    #[error("Invalid quantity '{value}' in row {row}")]
    InvalidQuantity { row: usize, value: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] crate::config::ConfigValidationError),

    /// SQLite error during materialization or aggregation.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipelineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable code for operator-facing output and log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::Ingest(_) => "INGEST_ERROR",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PipelineError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            PipelineError::MissingColumn("price".to_string()).error_code(),
            "MISSING_COLUMN"
        );
        assert_eq!(
            PipelineError::InvalidQuantity {
                row: 3,
                value: "three".to_string()
            }
            .error_code(),
            "INVALID_QUANTITY"
        );
    }

    #[test]
    fn test_with_context() {
        let error = PipelineError::MissingColumn("quantity".to_string())
            .with_context("During ingestion");
        assert!(error.to_string().contains("During ingestion"));
        assert_eq!(error.error_code(), "MISSING_COLUMN"); // Preserves original code
    }

    #[test]
    fn test_invalid_quantity_message() {
        let error = PipelineError::InvalidQuantity {
            row: 7,
            value: "lots".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid quantity 'lots' in row 7");
    }

    #[test]
    fn test_io_result_context() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let err = io.context("opening extract").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("opening extract"));
    }
}
