//! CLI argument definitions for finlens.
//!
//! This module contains the command-line interface structure using Clap.
//! The CLI supports analyzing an instrument against comparison symbols and
//! a market benchmark, and exporting the resulting tables to a workbook.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Run the full analysis and print the report |
//! | `export` | Run the analysis and write an xlsx workbook |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Serve from the offline deterministic catalog |
//! | `--timeout-ms` | `10000` | Per-request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! # Analyze a single ticker against the S&P 500
//! finlens analyze AAPL
//!
//! # Compare against up to two peers, JSON output
//! finlens analyze AAPL --compare MSFT --compare GOOGL --format json --pretty
//!
//! # Export the comparison and ratios tables
//! finlens export AAPL --compare MSFT --output analisis_financiero.xlsx
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use finlens_core::{DEFAULT_BENCHMARK, DEFAULT_EXPORT_FILENAME};

/// finlens - financial instrument analysis CLI
///
/// Fetch five years of daily closes from Yahoo Finance, derive return and
/// risk metrics, compare instruments on a common base-100 scale and export
/// the results.
#[derive(Debug, Parser)]
#[command(
    name = "finlens",
    author,
    version,
    about = "Financial instrument analysis CLI"
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - table: Aligned text report for terminal display (default)
    /// - json: Single JSON object
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve data from the built-in deterministic catalog instead of the
    /// live Yahoo Finance API.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Per-request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text report for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full analysis and print the report.
    ///
    /// Validates each symbol with a one-day probe, fetches five years of
    /// daily closes, and derives CAGR, annualized volatility, base-100
    /// normalized series and a linear trend for the primary instrument.
    ///
    /// # Examples
    ///
    ///   finlens analyze AAPL
    ///   finlens analyze AAPL --compare MSFT --compare GOOGL
    ///   finlens analyze AAPL --benchmark ^IXIC
    Analyze(AnalyzeArgs),

    /// Run the analysis and write the tables to an xlsx workbook.
    ///
    /// Writes the comparison table to the "Comparativa" sheet and the
    /// valuation ratios to the "Ratios" sheet.
    ///
    /// # Examples
    ///
    ///   finlens export AAPL
    ///   finlens export AAPL --compare MSFT --output report.xlsx
    Export(ExportArgs),
}

/// Arguments for the `analyze` command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Primary market symbol (e.g., AAPL).
    pub primary: String,

    /// Comparison symbol, repeatable up to two times.
    #[arg(long = "compare", value_name = "SYMBOL")]
    pub compare: Vec<String>,

    /// Benchmark index appended to every analysis.
    #[arg(long, default_value = DEFAULT_BENCHMARK)]
    pub benchmark: String,
}

/// Arguments for the `export` command.
#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    /// Destination workbook path.
    #[arg(long, default_value = DEFAULT_EXPORT_FILENAME)]
    pub output: PathBuf,
}
