//! Cached access to the source workbook
//!
//! The repository is owned by its caller. A load reads both sheets once and
//! keeps the result; later loads return the cached dataset until the
//! workbook's modification time changes or the caller invalidates it.

use crate::config::ReportConfig;
use crate::cost::{cost_entries_from_table, CostEntry, CostTable};
use crate::error::{ReportError, Result};
use crate::project::{projects_from_table, ProjectRecord};
use crate::sheet::read_workbook_sheets;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Raw rows loaded from the workbook, before any derivation
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub projects: Vec<ProjectRecord>,
    pub cost_entries: Vec<CostEntry>,
}

impl Dataset {
    /// Cost lookup built from the raw entries
    pub fn cost_table(&self) -> CostTable {
        CostTable::from_entries(&self.cost_entries)
    }
}

#[derive(Debug)]
struct CachedLoad {
    /// Source modification time at load (None if the platform lacks it)
    modified: Option<SystemTime>,
    dataset: Dataset,
}

impl CachedLoad {
    /// A cache is only reusable if both timestamps are known and equal
    fn is_fresh(&self, modified: Option<SystemTime>) -> bool {
        self.modified.is_some() && self.modified == modified
    }
}

#[derive(Debug)]
pub struct WorkbookRepository {
    path: PathBuf,
    detail_sheet: String,
    order_sheet: String,
    cached: Option<CachedLoad>,
    reads: usize,
}

impl WorkbookRepository {
    pub fn new(path: impl Into<PathBuf>, detail_sheet: impl Into<String>, order_sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            detail_sheet: detail_sheet.into(),
            order_sheet: order_sheet.into(),
            cached: None,
            reads: 0,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(&config.source_path, &config.detail_sheet, &config.order_sheet)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the dataset, reading the workbook only if the cache is stale.
    ///
    /// Fails with [`ReportError::MissingSourceData`] if the workbook does
    /// not exist; a previously cached dataset is discarded in that case.
    pub fn load(&mut self) -> Result<&Dataset> {
        if !self.path.exists() {
            self.cached = None;
            return Err(ReportError::MissingSourceData(self.path.clone()));
        }

        let modified = std::fs::metadata(&self.path)?.modified().ok();
        let cached = match self.cached.take() {
            Some(cached) if cached.is_fresh(modified) => {
                log::debug!("Using cached dataset for {}", self.path.display());
                cached
            }
            _ => CachedLoad {
                modified,
                dataset: self.read()?,
            },
        };

        Ok(&self.cached.insert(cached).dataset)
    }

    /// Drop the cached dataset so the next load reads the workbook again
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            log::debug!("Invalidated cached dataset for {}", self.path.display());
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Number of times the workbook has actually been read
    pub fn read_count(&self) -> usize {
        self.reads
    }

    fn read(&mut self) -> Result<Dataset> {
        let tables = read_workbook_sheets(
            &self.path,
            &[self.detail_sheet.as_str(), self.order_sheet.as_str()],
        )?;
        let (detail, order) = match tables.as_slice() {
            [detail, order] => (detail, order),
            _ => return Err(ReportError::MissingSheet(self.order_sheet.clone())),
        };

        let dataset = Dataset {
            projects: projects_from_table(detail)?,
            cost_entries: cost_entries_from_table(order)?,
        };
        self.reads += 1;

        log::info!(
            "Loaded {} projects and {} cost entries from {}",
            dataset.projects.len(),
            dataset.cost_entries.len(),
            self.path.display()
        );
        Ok(dataset)
    }
}
