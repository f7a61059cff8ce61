//! Load project records from the "Detail Pipeline" sheet

use super::ProjectRecord;
use crate::error::{ReportError, Result};
use crate::sheet::{read_csv_table, read_workbook_sheets, CellValue, SheetTable};
use std::path::Path;

/// Default sheet name holding project detail rows
pub const DETAIL_SHEET: &str = "Detail Pipeline";

pub const COL_SALES_NAME: &str = "Sales Name";
pub const COL_DATE_REGISTER: &str = "Date Register";
pub const COL_CLOSING_DATE: &str = "Bulan Closed";
pub const COL_CUSTOMER: &str = "Customer";
pub const COL_PROJECT_NAME: &str = "Project Name";
pub const COL_PRODUCT_TYPE: &str = "Type Product";
pub const COL_QUANTITY: &str = "QTY";
pub const COL_UNIT_PRICE: &str = "Harga Satuan";

/// Column positions resolved against a sheet's header row
struct DetailColumns {
    sales_name: usize,
    date_register: usize,
    closing_date: usize,
    customer: usize,
    project_name: usize,
    product_type: usize,
    quantity: usize,
    unit_price: usize,
}

impl DetailColumns {
    fn resolve(table: &SheetTable) -> Result<Self> {
        Ok(Self {
            sales_name: table.column_index(COL_SALES_NAME)?,
            date_register: table.column_index(COL_DATE_REGISTER)?,
            closing_date: table.column_index(COL_CLOSING_DATE)?,
            customer: table.column_index(COL_CUSTOMER)?,
            project_name: table.column_index(COL_PROJECT_NAME)?,
            product_type: table.column_index(COL_PRODUCT_TYPE)?,
            quantity: table.column_index(COL_QUANTITY)?,
            unit_price: table.column_index(COL_UNIT_PRICE)?,
        })
    }
}

/// Numeric cell, or `None` with a warning naming the cell
fn number(table: &SheetTable, row: usize, column: usize, name: &str) -> Option<f64> {
    let cell = table.cell(row, column);
    let value = cell.as_number();
    if value.is_none() {
        match cell {
            CellValue::Empty => log::warn!(
                "{} row {}: {} is missing",
                table.name,
                SheetTable::display_row(row),
                name
            ),
            other => log::warn!(
                "{} row {}: {} is not a number: {:?}",
                table.name,
                SheetTable::display_row(row),
                name,
                other
            ),
        }
    }
    value
}

fn text(table: &SheetTable, row: usize, column: usize) -> String {
    table.cell(row, column).as_text().unwrap_or_default()
}

/// Build project records from a detail table.
///
/// Blank rows are skipped. Unparseable dates and non-numeric quantities or
/// unit prices become `None`; the row itself is kept. Only a missing column
/// fails the load.
pub fn projects_from_table(table: &SheetTable) -> Result<Vec<ProjectRecord>> {
    let cols = DetailColumns::resolve(table)?;
    let mut projects = Vec::with_capacity(table.rows.len());
    let mut bad_register_dates = 0usize;

    for row in 0..table.rows.len() {
        if table.is_blank_row(row) {
            continue;
        }

        let register_cell = table.cell(row, cols.date_register);
        let date_register = register_cell.as_datetime();
        if date_register.is_none() {
            bad_register_dates += 1;
            log::debug!(
                "Row {}: unparseable {} {:?}",
                SheetTable::display_row(row),
                COL_DATE_REGISTER,
                register_cell
            );
        }

        projects.push(ProjectRecord {
            sales_name: text(table, row, cols.sales_name),
            date_register,
            closing_date: table.cell(row, cols.closing_date).as_datetime(),
            customer: text(table, row, cols.customer),
            project_name: text(table, row, cols.project_name),
            product_type: text(table, row, cols.product_type),
            quantity: number(table, row, cols.quantity, COL_QUANTITY),
            unit_price: number(table, row, cols.unit_price, COL_UNIT_PRICE),
        });
    }

    if bad_register_dates > 0 {
        log::warn!(
            "{} of {} project rows have no usable {}",
            bad_register_dates,
            projects.len(),
            COL_DATE_REGISTER
        );
    }

    Ok(projects)
}

/// Load all projects from a workbook sheet
pub fn load_projects<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Vec<ProjectRecord>> {
    let tables = read_workbook_sheets(path.as_ref(), &[sheet])?;
    let table = tables
        .first()
        .ok_or_else(|| ReportError::MissingSheet(sheet.to_string()))?;
    projects_from_table(table)
}

/// Load projects from CSV text (e.g., string buffer, exported sheet)
pub fn load_projects_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ProjectRecord>> {
    let table = read_csv_table(DETAIL_SHEET, reader)?;
    projects_from_table(&table)
}
