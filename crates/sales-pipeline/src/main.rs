//! CLI entry point for the sales ETL pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use sales_pipeline::{Pipeline, PipelineConfig, PriceImputation, RunSummary};
use std::path::Path;
use tracing::{error, info};

/// CLI-compatible price imputation strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPricePolicy {
    /// Substitute 0.0 and keep the row
    Zero,
    /// Drop rows with a missing or unparseable price
    Drop,
}

impl From<CliPricePolicy> for PriceImputation {
    fn from(cli: CliPricePolicy) -> Self {
        match cli {
            CliPricePolicy::Zero => PriceImputation::Zero,
            CliPricePolicy::Drop => PriceImputation::Drop,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Sales ETL pipeline: clean, store, aggregate, report",
    long_about = "A one-shot batch pipeline for raw sales extracts.\n\n\
                  EXAMPLES:\n  \
                  # Basic usage\n  \
                  sales-pipeline -i data/raw_sales_data.csv\n\n  \
                  # Custom database and report locations\n  \
                  sales-pipeline -i extract.csv -d out/sales.db -r out/report.txt\n\n  \
                  # Strict price handling (drop rows with missing price)\n  \
                  sales-pipeline -i extract.csv --price-policy drop"
)]
struct Args {
    /// Path to the raw sales extract (CSV)
    #[arg(short, long, default_value = "data/raw_sales_data.csv")]
    input: String,

    /// Path of the SQLite database the cleaned rows are materialized into
    #[arg(short, long, default_value = "database/sales.db")]
    database: String,

    /// Path of the generated summary report
    #[arg(short, long, default_value = "reports/summary_report.txt")]
    report: String,

    /// Name of the table holding the cleaned rows (fully replaced each run)
    #[arg(long, default_value = "sales")]
    table: String,

    /// Currency label used for monetary lines in the report
    #[arg(long, default_value = "INR")]
    currency: String,

    /// How rows with a missing or unparseable price are handled
    #[arg(long, value_enum, default_value = "zero")]
    price_policy: CliPricePolicy,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Output the run summary as JSON to stdout instead of the
    /// human-readable summary
    ///
    /// Disables all progress logs; only the JSON is written to stdout.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    // The store and report writer expect their parent directories to exist.
    for path in [&args.database, &args.report] {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created directory: {}", parent.display());
            }
        }
    }

    let config = PipelineConfig::builder()
        .input_path(&args.input)
        .database_path(&args.database)
        .report_path(&args.report)
        .table_name(&args.table)
        .currency(&args.currency)
        .price_imputation(args.price_policy.into())
        .build()?;

    let pipeline = Pipeline::new(config)?;

    match pipeline.run() {
        Ok(summary) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else if !args.quiet {
                print_run_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            error!(code = e.error_code(), "Pipeline failed: {}", e);
            Err(anyhow!("Pipeline failed: {}", e))
        }
    }
}

/// Print a human-readable summary of the run.
///
/// Uses `println!` intentionally: this is the primary user-facing output,
/// visible regardless of log level settings.
fn print_run_summary(summary: &RunSummary) {
    println!();
    println!("{}", "=".repeat(60));
    println!("PIPELINE COMPLETE");
    println!("{}", "=".repeat(60));
    println!();
    println!(
        "Rows: {} ingested -> {} retained",
        summary.rows_ingested, summary.rows_retained
    );
    if summary.dropped_invalid_date > 0 {
        println!("  {} dropped (invalid order date)", summary.dropped_invalid_date);
    }
    if summary.defaulted_prices > 0 {
        println!("  {} prices defaulted to 0", summary.defaulted_prices);
    }
    if summary.dropped_missing_price > 0 {
        println!("  {} dropped (missing price)", summary.dropped_missing_price);
    }
    println!();
    println!("Database: {}", summary.database_path.display());
    println!("Report:   {}", summary.report_path.display());
    println!("Duration: {}ms", summary.duration_ms);
    println!("{}", "=".repeat(60));
}
