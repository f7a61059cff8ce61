//! Product acquisition cost lookup built from the "Order Philips" sheet

use crate::error::{ReportError, Result};
use crate::sheet::{read_csv_table, read_workbook_sheets, SheetTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default sheet name holding product cost rows
pub const ORDER_SHEET: &str = "Order Philips";

pub const COL_PRODUCT_NAME: &str = "Nama Produk";
pub const COL_ACQUISITION_COST: &str = "Harga Perolehan";

/// One raw row of the cost sheet; either value may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    pub product_name: Option<String>,
    pub acquisition_cost: Option<f64>,
}

impl CostEntry {
    pub fn new(product_name: impl Into<String>, acquisition_cost: f64) -> Self {
        Self {
            product_name: Some(product_name.into()),
            acquisition_cost: Some(acquisition_cost),
        }
    }
}

/// Product name → acquisition cost, one entry per product
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    costs: HashMap<String, f64>,
}

impl CostTable {
    /// Build the lookup from raw entries.
    ///
    /// Entries missing a product name or a cost are dropped. When a product
    /// appears more than once the first cost encountered is kept and the
    /// later ones are ignored.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a CostEntry>,
    {
        let mut costs = HashMap::new();
        let mut incomplete = 0usize;
        let mut duplicates = 0usize;

        for entry in entries {
            let (name, cost) = match (&entry.product_name, entry.acquisition_cost) {
                (Some(name), Some(cost)) if !name.trim().is_empty() => (name.trim(), cost),
                _ => {
                    incomplete += 1;
                    continue;
                }
            };

            if costs.contains_key(name) {
                duplicates += 1;
                log::debug!("Ignoring duplicate cost for '{}': {}", name, cost);
                continue;
            }
            costs.insert(name.to_string(), cost);
        }

        log::debug!(
            "Cost table: {} products, {} incomplete entries dropped, {} duplicates ignored",
            costs.len(),
            incomplete,
            duplicates
        );

        Self { costs }
    }

    /// Acquisition cost for a product, if known
    pub fn get(&self, product_name: &str) -> Option<f64> {
        self.costs.get(product_name.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

/// Read raw cost entries from a cost table
pub fn cost_entries_from_table(table: &SheetTable) -> Result<Vec<CostEntry>> {
    let name_col = table.column_index(COL_PRODUCT_NAME)?;
    let cost_col = table.column_index(COL_ACQUISITION_COST)?;

    Ok((0..table.rows.len())
        .filter(|&row| !table.is_blank_row(row))
        .map(|row| CostEntry {
            product_name: table.cell(row, name_col).as_text(),
            acquisition_cost: table.cell(row, cost_col).as_number(),
        })
        .collect())
}

/// Load raw cost entries from a workbook sheet
pub fn load_cost_entries<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Vec<CostEntry>> {
    let tables = read_workbook_sheets(path.as_ref(), &[sheet])?;
    let table = tables
        .first()
        .ok_or_else(|| ReportError::MissingSheet(sheet.to_string()))?;
    cost_entries_from_table(table)
}

/// Load raw cost entries from CSV text
pub fn load_cost_entries_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<CostEntry>> {
    let table = read_csv_table(ORDER_SHEET, reader)?;
    cost_entries_from_table(&table)
}
