//! Export of the enriched project table to xlsx or CSV
//!
//! One header row, then one row per project with the source columns followed
//! by the derived ones. Missing values are written as blank cells.

use crate::error::{ReportError, Result};
use crate::profit::EnrichedProject;
use crate::sheet::datetime_to_excel_serial;
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sheet name used in exported workbooks
pub const EXPORT_SHEET: &str = "Dashboard Export";

pub const EXPORT_HEADERS: [&str; 18] = [
    "Sales Name",
    "Date Register",
    "Bulan Closed",
    "Customer",
    "Project Name",
    "Type Product",
    "QTY",
    "Harga Satuan",
    "Harga Perolehan",
    "Aging Days",
    "Aging Category",
    "Highlight",
    "Harga Netto",
    "Total Jual Netto",
    "Total Perolehan",
    "Profit Value",
    "Profit %",
    "Bulan Transaksi",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to xlsx
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Xlsx,
        }
    }
}

/// A single output cell
#[derive(Debug, Clone, PartialEq)]
enum ExportValue {
    Blank,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl ExportValue {
    fn text(s: &str) -> Self {
        if s.is_empty() {
            ExportValue::Blank
        } else {
            ExportValue::Text(s.to_string())
        }
    }

    fn number(v: Option<f64>) -> Self {
        v.map_or(ExportValue::Blank, ExportValue::Number)
    }

    fn date(v: Option<NaiveDateTime>) -> Self {
        v.map_or(ExportValue::Blank, ExportValue::Date)
    }

    fn to_csv_field(&self) -> String {
        match self {
            ExportValue::Blank => String::new(),
            ExportValue::Text(s) => s.clone(),
            ExportValue::Number(v) => v.to_string(),
            ExportValue::Date(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn export_row(p: &EnrichedProject) -> [ExportValue; 18] {
    let r = &p.project;
    [
        ExportValue::text(&r.sales_name),
        ExportValue::date(r.date_register),
        ExportValue::date(r.closing_date),
        ExportValue::text(&r.customer),
        ExportValue::text(&r.project_name),
        ExportValue::text(&r.product_type),
        ExportValue::number(r.quantity),
        ExportValue::number(r.unit_price),
        ExportValue::number(p.profit.acquisition_cost),
        ExportValue::number(p.aging.days.map(|d| d as f64)),
        ExportValue::text(p.aging.category.as_str()),
        ExportValue::text(p.aging.highlight.as_str()),
        ExportValue::number(p.profit.net_unit_price),
        ExportValue::number(p.profit.net_total_sale),
        ExportValue::number(p.profit.total_acquisition_cost),
        ExportValue::number(p.profit.profit_value),
        ExportValue::number(p.profit.profit_percent),
        p.transaction_month
            .map_or(ExportValue::Blank, |m| ExportValue::Text(m.to_string())),
    ]
}

fn build_workbook(records: &[EnrichedProject]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET)?;

    for (col, name) in EXPORT_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in export_row(record).into_iter().enumerate() {
            let col = col as u16;
            match value {
                ExportValue::Blank => {}
                ExportValue::Text(s) => {
                    sheet.write_string(row, col, s)?;
                }
                ExportValue::Number(v) => {
                    sheet.write_number(row, col, v)?;
                }
                ExportValue::Date(dt) => {
                    sheet.write_number_with_format(row, col, datetime_to_excel_serial(dt), &date)?;
                }
            }
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    Ok(workbook)
}

/// Render the table as xlsx bytes (e.g. for a download response)
pub fn export_xlsx_to_buffer(records: &[EnrichedProject]) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(records)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write the table to an xlsx file
pub fn export_xlsx(records: &[EnrichedProject], path: &Path) -> Result<()> {
    let mut workbook = build_workbook(records)?;
    workbook
        .save(path)
        .map_err(|e| ReportError::Export(format!("{}: {}", path.display(), e)))?;
    log::info!("Exported {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Write the table as CSV to any writer
pub fn export_csv<W: std::io::Write>(records: &[EnrichedProject], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        csv_writer.write_record(export_row(record).iter().map(ExportValue::to_csv_field))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the table to a file in the given format
pub fn export_to_path(records: &[EnrichedProject], path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Xlsx => export_xlsx(records, path),
        ExportFormat::Csv => {
            let file = std::fs::File::create(path)
                .map_err(|e| ReportError::Export(format!("{}: {}", path.display(), e)))?;
            export_csv(records, file)?;
            log::info!("Exported {} rows to {}", records.len(), path.display());
            Ok(())
        }
    }
}
