//! Aging & Profit Report - project pipeline reporting over spreadsheet data
//!
//! This library provides:
//! - Loading of the pipeline detail and product cost sheets (xlsx or CSV)
//! - Aging per project (days since registration, bucketed)
//! - Net-of-tax profit per project against acquisition cost
//! - Aggregation views (aging counts, profit per project, monthly filter)
//! - Export of the enriched table to xlsx or CSV

pub mod error;
pub mod sheet;
pub mod project;
pub mod cost;
pub mod aging;
pub mod profit;
pub mod summary;
pub mod config;
pub mod repository;
pub mod pipeline;
pub mod export;
pub mod entry;

// Re-export commonly used types
pub use error::ReportError;
pub use project::{ProjectRecord, TransactionMonth};
pub use cost::{CostEntry, CostTable};
pub use aging::{compute_aging, compute_aging_now, AgedProject, Aging, AgingCategory, RowHighlight};
pub use profit::{compute_profit, EnrichedProject, Profit, DEFAULT_TAX_RATE};
pub use config::ReportConfig;
pub use repository::{Dataset, WorkbookRepository};
pub use pipeline::ReportRunner;
pub use entry::ProjectEntry;
