//! Error type shared by the loaders, the repository and the exporters

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Source data not found: {}", .0.display())]
    MissingSourceData(PathBuf),

    #[error("Failed to read workbook {}: {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Sheet not found: {0}")]
    MissingSheet(String),

    #[error("Sheet '{sheet}' has no column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
