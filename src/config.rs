//! Report configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes, e.g. `{"tax_rate": 0.12}`.

use crate::cost::ORDER_SHEET;
use crate::error::{ReportError, Result};
use crate::profit::DEFAULT_TAX_RATE;
use crate::project::DETAIL_SHEET;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default workbook holding both source sheets
pub const DEFAULT_SOURCE_PATH: &str = "challenge.xlsx";

/// Default destination for the spreadsheet export
pub const DEFAULT_EXPORT_PATH: &str = "dashboard_export.xlsx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Workbook containing the detail and order sheets
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,

    /// Sheet with project detail rows
    #[serde(default = "default_detail_sheet")]
    pub detail_sheet: String,

    /// Sheet with product acquisition costs
    #[serde(default = "default_order_sheet")]
    pub order_sheet: String,

    /// Sales tax rate as a fraction (0.11 = 11%)
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
}

fn default_source_path() -> PathBuf { PathBuf::from(DEFAULT_SOURCE_PATH) }
fn default_detail_sheet() -> String { DETAIL_SHEET.to_string() }
fn default_order_sheet() -> String { ORDER_SHEET.to_string() }
fn default_tax_rate() -> f64 { DEFAULT_TAX_RATE }
fn default_export_path() -> PathBuf { PathBuf::from(DEFAULT_EXPORT_PATH) }

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            detail_sheet: default_detail_sheet(),
            order_sheet: default_order_sheet(),
            tax_rate: default_tax_rate(),
            export_path: default_export_path(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tax_rate.is_finite() || self.tax_rate < 0.0 {
            return Err(ReportError::InvalidConfig(format!(
                "tax_rate must be a non-negative number, got {}",
                self.tax_rate
            )));
        }
        if self.detail_sheet.trim().is_empty() || self.order_sheet.trim().is_empty() {
            return Err(ReportError::InvalidConfig("sheet names must not be empty".into()));
        }
        Ok(())
    }
}
