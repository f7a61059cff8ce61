//! Sheet-level table reading
//!
//! Workbook sheets and CSV files are both read into a [`SheetTable`]: a
//! header row plus typed cells. Record types are built from a table by
//! looking up their columns by header name, so column order in the source
//! does not matter.

use crate::error::{ReportError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::Path;

/// A single cell as read from a sheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Build a cell from raw text; blank text is an empty cell
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text content of the cell. Whole numbers render without a fraction so
    /// that numeric product codes match their text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                Some(format!("{}", *v as i64))
            }
            CellValue::Number(v) => Some(v.to_string()),
            CellValue::DateTime(dt) => Some(dt.to_string()),
        }
    }

    /// Numeric content of the cell, parsing text if needed
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if v.is_finite() => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Date/time content of the cell.
    ///
    /// Numbers are read as Excel serial dates; text is tried against the
    /// formats in [`parse_datetime`]. Anything else is `None`.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Number(v) => excel_serial_to_datetime(*v),
            CellValue::Text(s) => parse_datetime(s),
            CellValue::Empty => None,
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::from_text(s),
            Data::Float(v) => CellValue::Number(*v),
            Data::Int(v) => CellValue::Number(*v as f64),
            Data::Bool(v) => CellValue::Text(v.to_string()),
            Data::DateTime(v) => v
                .as_datetime()
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Empty),
            Data::DateTimeIso(s) => parse_datetime(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::from_text(s)),
            Data::DurationIso(s) => CellValue::from_text(s),
            // #N/A, #DIV/0! and friends carry no usable value
            Data::Error(_) => CellValue::Empty,
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Parse a date or date-time from text.
///
/// Accepts ISO dates and date-times, `month/day/year` (tried first, so an
/// ambiguous `01/02/2024` is January 2), `day/month/year`, written-out
/// month names, and month-only values such as `2024-03` or `March 2024`
/// (which resolve to the first of the month). Returns `None` when nothing
/// matches.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    // Month-only values
    let month_only = [
        (format!("{text}-01"), "%Y-%m-%d"),
        (format!("1 {text}"), "%d %B %Y"),
        (format!("1 {text}"), "%d %b %Y"),
    ];
    month_only
        .iter()
        .find_map(|(candidate, fmt)| NaiveDate::parse_from_str(candidate, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Convert an Excel serial date (days since 1899-12-30) to a date-time
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    // 2958465 is 9999-12-31, the last date Excel can represent
    if !serial.is_finite() || !(0.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

/// Convert a date-time to an Excel serial date
pub fn datetime_to_excel_serial(dt: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN);
    (dt - epoch).num_milliseconds() as f64 / 86_400_000.0
}

/// A header row plus data rows read from one sheet
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| normalize_header(h)).collect(),
            rows,
        }
    }

    /// Index of the column with the given header
    pub fn column_index(&self, header: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| ReportError::MissingColumn {
                sheet: self.name.clone(),
                column: header.to_string(),
            })
    }

    /// Cell at (row, column); short rows read as empty
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Whether every cell in the row is empty
    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map_or(true, |r| r.iter().all(CellValue::is_empty))
    }

    /// Spreadsheet row number (1-based, header on row 1) for a data row index
    pub fn display_row(row: usize) -> usize {
        row + 2
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Read the named sheets from a workbook (xlsx, xls, xlsb or ods)
pub fn read_workbook_sheets(path: &Path, names: &[&str]) -> Result<Vec<SheetTable>> {
    if !path.exists() {
        return Err(ReportError::MissingSourceData(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| ReportError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let available = workbook.sheet_names();

    let mut tables = Vec::with_capacity(names.len());
    for &name in names {
        if !available.iter().any(|s| s == name) {
            return Err(ReportError::MissingSheet(name.to_string()));
        }

        let range = workbook
            .worksheet_range(name)
            .map_err(|e| ReportError::Workbook {
                path: path.to_path_buf(),
                message: format!("sheet '{}': {}", name, e),
            })?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|r| {
                r.iter()
                    .map(|c| CellValue::from(c).as_text().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        let data: Vec<Vec<CellValue>> = rows
            .map(|r| r.iter().map(CellValue::from).collect())
            .collect();

        log::debug!("Read sheet '{}': {} columns, {} rows", name, headers.len(), data.len());
        tables.push(SheetTable::new(name, headers, data));
    }

    Ok(tables)
}

/// Read a CSV file into a table named after the given sheet
pub fn read_csv_table<R: std::io::Read>(name: &str, reader: R) -> Result<SheetTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(SheetTable::new(name, headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert_eq!(parse_datetime("2024-01-15"), Some(dt(2024, 1, 15)));
        assert_eq!(parse_datetime(" 2024/01/15 "), Some(dt(2024, 1, 15)));
        assert_eq!(parse_datetime("01/15/2024"), Some(dt(2024, 1, 15)));
        assert_eq!(parse_datetime("15 January 2024"), Some(dt(2024, 1, 15)));
        assert_eq!(parse_datetime("15/01/2024"), Some(dt(2024, 1, 15)));
        assert_eq!(parse_datetime("15-01-2024"), Some(dt(2024, 1, 15)));
        assert_eq!(parse_datetime("01/02/2024"), Some(dt(2024, 1, 2)));
        assert_eq!(
            parse_datetime("15/01/2024 09:30"),
            Some(dt(2024, 1, 15) + Duration::minutes(9 * 60 + 30))
        );
        assert_eq!(
            parse_datetime("2024-01-15 13:30:00"),
            Some(dt(2024, 1, 15) + Duration::minutes(13 * 60 + 30))
        );
        assert_eq!(
            parse_datetime("2024-01-15T08:00:00"),
            Some(dt(2024, 1, 15) + Duration::hours(8))
        );
    }

    #[test]
    fn test_parse_month_only() {
        assert_eq!(parse_datetime("2024-03"), Some(dt(2024, 3, 1)));
        assert_eq!(parse_datetime("March 2024"), Some(dt(2024, 3, 1)));
        assert_eq!(parse_datetime("Mar 2024"), Some(dt(2024, 3, 1)));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("belum closed"), None);
        assert_eq!(parse_datetime("2024-13-45"), None);
    }

    #[test]
    fn test_excel_serial() {
        // 45292 is 2024-01-01 in Excel's 1900 date system
        assert_eq!(excel_serial_to_datetime(45292.0), Some(dt(2024, 1, 1)));
        assert_eq!(
            excel_serial_to_datetime(45292.5),
            Some(dt(2024, 1, 1) + Duration::hours(12))
        );
        assert_eq!(excel_serial_to_datetime(-1.0), None);
        assert_eq!(excel_serial_to_datetime(f64::NAN), None);
        assert_eq!(datetime_to_excel_serial(dt(2024, 1, 1)), 45292.0);
    }

    #[test]
    fn test_cell_text_and_number() {
        assert_eq!(CellValue::Number(1234.0).as_text().as_deref(), Some("1234"));
        assert_eq!(CellValue::Number(12.5).as_text().as_deref(), Some("12.5"));
        assert_eq!(CellValue::from_text("  "), CellValue::Empty);
        assert_eq!(CellValue::from_text(" 42 ").as_number(), Some(42.0));
        assert_eq!(CellValue::from_text("n/a").as_number(), None);
        assert_eq!(CellValue::DateTime(dt(2024, 1, 1)).as_number(), None);
    }

    #[test]
    fn test_read_csv_table() {
        let data = "\u{feff}Nama Produk , Harga Perolehan\nLamp A,50\n,\nLamp B\n";
        let table = read_csv_table("Order Philips", data.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["Nama Produk", "Harga Perolehan"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.column_index("Harga Perolehan").unwrap(), 1);
        assert_eq!(table.cell(0, 1).as_number(), Some(50.0));
        assert!(table.is_blank_row(1));
        // Short row reads as empty
        assert!(table.cell(2, 1).is_empty());
    }

    #[test]
    fn test_missing_column() {
        let table = SheetTable::new("Order Philips", vec!["Nama Produk".to_string()], vec![]);
        let err = table.column_index("Harga Perolehan").unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn { .. }));
    }

    #[test]
    fn test_missing_workbook() {
        let path = std::env::temp_dir().join("aging-profit-report-no-such-file.xlsx");
        let err = read_workbook_sheets(&path, &["Detail Pipeline"]).unwrap_err();
        assert!(matches!(err, ReportError::MissingSourceData(_)));
    }
}
