//! Formatted tabular records shared by the renderer and the exporter.
//!
//! Everything here turns already-derived values into display strings; no
//! computation happens at this layer.

use serde::Serialize;

use crate::metrics::{MetricValue, SymbolMetrics};
use crate::CompanyProfile;

/// Placeholder for any absent value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Labeled row of formatted cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<String>,
}

/// Tabular record: column headers plus labeled rows, mirrored one-to-one
/// into an export sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRecord {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TableRecord {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<String>) {
        self.rows.push(TableRow {
            label: label.into(),
            cells,
        });
    }
}

/// `0.1234` -> `"12.34%"`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Plain two-decimal ratio formatting.
pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}

fn percent_or_na(value: &MetricValue) -> String {
    value
        .as_available()
        .map(format_percent)
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}

/// Return/risk comparison table: one row per instrument.
pub fn comparison_table(metrics: &[SymbolMetrics]) -> TableRecord {
    let mut table = TableRecord::new(vec![
        String::from("CAGR 1y"),
        String::from("CAGR 3y"),
        String::from("CAGR 5y"),
        String::from("Annualized Volatility"),
    ]);

    for record in metrics {
        table.push_row(
            record.symbol.as_str(),
            vec![
                percent_or_na(&record.cagr_1y),
                percent_or_na(&record.cagr_3y),
                percent_or_na(&record.cagr_5y),
                percent_or_na(&record.volatility),
            ],
        );
    }

    table
}

/// Valuation/profitability ratios table for the primary instrument.
///
/// ROE and net margin arrive as fractions and render as percentages; the
/// remaining figures render as plain ratios.
pub fn ratios_table(profile: &CompanyProfile) -> TableRecord {
    let ratios = &profile.ratios;
    let format_opt_ratio = |value: Option<f64>| {
        value
            .map(format_ratio)
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
    };
    let format_opt_percent = |value: Option<f64>| {
        value
            .map(format_percent)
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
    };

    let mut table = TableRecord::new(vec![String::from("Value")]);
    table.push_row("P/E", vec![format_opt_ratio(ratios.pe)]);
    table.push_row("P/B", vec![format_opt_ratio(ratios.price_to_book)]);
    table.push_row("ROE", vec![format_opt_percent(ratios.return_on_equity)]);
    table.push_row("Debt/Equity", vec![format_opt_ratio(ratios.debt_to_equity)]);
    table.push_row("Net Margin", vec![format_opt_percent(ratios.net_margin)]);
    table
}
