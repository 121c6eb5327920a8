//! Terminal rendering for analysis reports.
//!
//! JSON mode serializes the report as-is; table mode prints a profile panel,
//! sparkline charts of the normalized series and the two report tables.
//! Rejected-symbol warnings always go to stderr so piped JSON stays clean.

use std::path::Path;

use serde_json::json;

use finlens_core::{
    AnalysisReport, ChartSeries, TableRecord, COMPARISON_SHEET, NOT_AVAILABLE, RATIOS_SHEET,
};

use crate::cli::OutputFormat;
use crate::error::CliError;

const SPARKLINE_WIDTH: usize = 60;
const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn render_report(
    report: &AnalysisReport,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    emit_warnings(report);

    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(report),
    }

    Ok(())
}

pub fn render_export_summary(
    report: &AnalysisReport,
    path: &Path,
    bytes: usize,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    emit_warnings(report);

    match format {
        OutputFormat::Json => {
            let payload = json!({
                "path": path.display().to_string(),
                "bytes": bytes,
                "sheets": [COMPARISON_SHEET, RATIOS_SHEET],
                "rejected": report.rejected,
            });
            let rendered = if pretty {
                serde_json::to_string_pretty(&payload)?
            } else {
                serde_json::to_string(&payload)?
            };
            println!("{rendered}");
        }
        OutputFormat::Table => {
            println!(
                "wrote {} ({bytes} bytes, sheets: {COMPARISON_SHEET}, {RATIOS_SHEET})",
                path.display()
            );
        }
    }

    Ok(())
}

fn emit_warnings(report: &AnalysisReport) {
    for rejected in &report.rejected {
        eprintln!("warning: skipping '{}': {}", rejected.symbol, rejected.status);
    }
}

fn render_table(report: &AnalysisReport) {
    let profile = &report.profile;
    let title = profile
        .name
        .clone()
        .unwrap_or_else(|| profile.symbol.to_string());

    println!("{title}");
    println!("{}", "=".repeat(title.chars().count()));
    println!("symbol : {}", profile.symbol);
    println!(
        "sector : {}",
        profile.sector.as_deref().unwrap_or(NOT_AVAILABLE)
    );
    if let Some(description) = &profile.description {
        println!();
        for line in wrap(description, 78) {
            println!("{line}");
        }
    }

    println!();
    println!("Normalized performance (base 100, 5y)");
    let label_width = report
        .instruments
        .iter()
        .map(|instrument| instrument.normalized.label.chars().count())
        .chain(report.trend.iter().map(|trend| trend.label.chars().count()))
        .max()
        .unwrap_or(0);
    for instrument in &report.instruments {
        print_sparkline(&instrument.normalized, label_width);
    }
    if let Some(trend) = &report.trend {
        print_sparkline(trend, label_width);
    }

    println!();
    print_table("Comparison", &report.comparison);
    println!();
    print_table("Ratios", &report.ratios);
}

fn print_sparkline(series: &ChartSeries, label_width: usize) {
    let values = series.values();
    if values.is_empty() {
        println!("{:<label_width$}  (no data)", series.label);
        return;
    }

    let last = values[values.len() - 1];
    println!(
        "{:<label_width$}  {}  {:>8.2}",
        series.label,
        sparkline(&values, SPARKLINE_WIDTH),
        last
    );
}

fn sparkline(values: &[f64], width: usize) -> String {
    let sampled = sample(values, width);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in &sampled {
        min = min.min(*value);
        max = max.max(*value);
    }

    let span = max - min;
    sampled
        .iter()
        .map(|value| {
            if span <= 0.0 {
                return SPARK_GLYPHS[0];
            }
            let bucket = ((value - min) / span * (SPARK_GLYPHS.len() - 1) as f64).round();
            SPARK_GLYPHS[bucket as usize]
        })
        .collect()
}

fn sample(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width {
        return values.to_vec();
    }
    (0..width)
        .map(|index| {
            let position = index * (values.len() - 1) / (width - 1);
            values[position]
        })
        .collect()
}

fn print_table(title: &str, table: &TableRecord) {
    println!("{title}");

    let label_width = table
        .rows
        .iter()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);
    let mut widths: Vec<usize> = table
        .columns
        .iter()
        .map(|column| column.chars().count())
        .collect();
    for row in &table.rows {
        for (index, cell) in row.cells.iter().enumerate() {
            if index < widths.len() {
                widths[index] = widths[index].max(cell.chars().count());
            }
        }
    }

    let mut header = format!("{:<label_width$}", "");
    for (column, &width) in table.columns.iter().zip(&widths) {
        header.push_str(&format!("  {column:>width$}"));
    }
    println!("{header}");

    for row in &table.rows {
        let mut line = format!("{:<label_width$}", row.label);
        for (cell, &width) in row.cells.iter().zip(&widths) {
            line.push_str(&format!("  {cell:>width$}"));
        }
        println!("{line}");
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkline_spans_the_glyph_range() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let line = sparkline(&values, 10);

        assert_eq!(line.chars().count(), 10);
        assert_eq!(line.chars().next(), Some('▁'));
        assert_eq!(line.chars().last(), Some('█'));
    }

    #[test]
    fn flat_series_renders_the_lowest_glyph() {
        let line = sparkline(&[5.0, 5.0, 5.0], 3);
        assert_eq!(line, "▁▁▁");
    }

    #[test]
    fn sampling_keeps_first_and_last_values() {
        let values: Vec<f64> = (0..1000).map(f64::from).collect();
        let sampled = sample(&values, 60);

        assert_eq!(sampled.len(), 60);
        assert_eq!(sampled[0], 0.0);
        assert_eq!(sampled[59], 999.0);
    }

    #[test]
    fn wrap_respects_the_width_limit() {
        let lines = wrap("alpha beta gamma delta epsilon", 11);
        assert!(lines.iter().all(|line| line.chars().count() <= 11));
        assert_eq!(lines.join(" "), "alpha beta gamma delta epsilon");
    }
}
