//! Report formatter: renders the aggregate results into the fixed-layout
//! text report.
//!
//! Absence is a first-class case here, never an error: any aggregate with no
//! backing rows renders as [`NO_DATA_MARKER`], applied uniformly to all
//! three sections.

use crate::error::Result;
use crate::types::SalesSummary;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Marker written in place of any absent aggregate.
pub const NO_DATA_MARKER: &str = "No data available";

/// Renders and writes the summary report.
pub struct ReportGenerator {
    report_path: PathBuf,
    currency: String,
}

impl ReportGenerator {
    pub fn new(report_path: impl Into<PathBuf>, currency: impl Into<String>) -> Self {
        Self {
            report_path: report_path.into(),
            currency: currency.into(),
        }
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Render the four fixed sections: header, total revenue, top product,
    /// top customer. Pure; does not touch the filesystem.
    pub fn render(&self, summary: &SalesSummary) -> String {
        let mut out = String::new();

        out.push_str("SALES DATA SUMMARY REPORT\n");
        out.push_str("=========================\n\n");

        match summary.total_revenue {
            Some(revenue) => {
                out.push_str(&format!("Total Revenue: {} {:.2}\n\n", self.currency, revenue));
            }
            None => out.push_str(&format!("Total Revenue: {NO_DATA_MARKER}\n\n")),
        }

        out.push_str("Top Selling Product:\n");
        match &summary.top_product {
            Some(top) => out.push_str(&format!("{} ({} units)\n\n", top.product, top.units)),
            None => out.push_str(&format!("{NO_DATA_MARKER}\n\n")),
        }

        out.push_str("Top Customer by Spend:\n");
        match &summary.top_customer {
            Some(top) => out.push_str(&format!(
                "{} ({} {:.2})\n",
                top.customer_id, self.currency, top.spend
            )),
            None => out.push_str(&format!("{NO_DATA_MARKER}\n")),
        }

        out
    }

    /// Write the report, overwriting any prior one. Creates the parent
    /// directory if needed.
    pub fn write(&self, summary: &SalesSummary) -> Result<PathBuf> {
        if let Some(parent) = self.report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.report_path, self.render(summary))?;

        info!("Report saved: {}", self.report_path.display());
        Ok(self.report_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomerSpend, ProductSales};
    use pretty_assertions::assert_eq;

    fn full_summary() -> SalesSummary {
        SalesSummary {
            total_revenue: Some(30.0),
            top_product: Some(ProductSales {
                product: "Widget".to_string(),
                units: 3,
            }),
            top_customer: Some(CustomerSpend {
                customer_id: "C1".to_string(),
                spend: 20.0,
            }),
        }
    }

    #[test]
    fn test_render_full_report() {
        let generator = ReportGenerator::new("report.txt", "INR");
        let text = generator.render(&full_summary());

        let expected = "\
SALES DATA SUMMARY REPORT
=========================

Total Revenue: INR 30.00

Top Selling Product:
Widget (3 units)

Top Customer by Spend:
C1 (INR 20.00)
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_absent_aggregates_does_not_error() {
        let generator = ReportGenerator::new("report.txt", "INR");
        let text = generator.render(&SalesSummary::default());

        assert_eq!(text.matches(NO_DATA_MARKER).count(), 3);
        assert!(text.starts_with("SALES DATA SUMMARY REPORT\n"));
        assert!(text.contains("Total Revenue: No data available\n"));
    }

    #[test]
    fn test_currency_label_is_configurable() {
        let generator = ReportGenerator::new("report.txt", "USD");
        let text = generator.render(&full_summary());
        assert!(text.contains("Total Revenue: USD 30.00"));
        assert!(text.contains("C1 (USD 20.00)"));
    }

    #[test]
    fn test_write_overwrites_prior_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("summary_report.txt");
        let generator = ReportGenerator::new(&path, "INR");
        assert_eq!(generator.report_path(), path.as_path());

        generator.write(&full_summary()).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();

        generator.write(&SalesSummary::default()).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();

        assert!(first.contains("Widget"));
        assert!(!second.contains("Widget"));
        assert!(second.contains(NO_DATA_MARKER));
    }
}
