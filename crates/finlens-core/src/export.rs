//! Workbook export.
//!
//! The report's comparison and ratios tables are written verbatim into two
//! worksheets of an in-memory xlsx workbook; no values are recomputed here.

use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

use crate::analysis::AnalysisReport;
use crate::report::TableRecord;

/// MIME type advertised for downloaded workbooks.
pub const EXPORT_MIME: &str = "application/vnd.ms-excel";

/// Default export file name.
pub const DEFAULT_EXPORT_FILENAME: &str = "analisis_financiero.xlsx";

pub const COMPARISON_SHEET: &str = "Comparativa";
pub const RATIOS_SHEET: &str = "Ratios";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("workbook error: {0}")]
    Workbook(#[from] XlsxError),

    #[error("nothing to export")]
    Empty,
}

/// Serialize named tables into workbook bytes, one sheet per table.
///
/// Row 0 carries the column headers starting at column 1; column 0 carries
/// the row labels.
pub fn write_workbook(sheets: &[(&str, &TableRecord)]) -> Result<Vec<u8>, ExportError> {
    if sheets.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;

        for (index, column) in table.columns.iter().enumerate() {
            worksheet.write_string(0, index as u16 + 1, column)?;
        }
        for (row_index, row) in table.rows.iter().enumerate() {
            let row_number = row_index as u32 + 1;
            worksheet.write_string(row_number, 0, &row.label)?;
            for (cell_index, cell) in row.cells.iter().enumerate() {
                worksheet.write_string(row_number, cell_index as u16 + 1, cell)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Export the report's two tables with their fixed sheet names.
pub fn export_report(report: &AnalysisReport) -> Result<Vec<u8>, ExportError> {
    write_workbook(&[
        (COMPARISON_SHEET, &report.comparison),
        (RATIOS_SHEET, &report.ratios),
    ])
}
