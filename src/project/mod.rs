//! Project data structures and pipeline sheet loading

mod data;
pub mod loader;

pub use data::{ProjectRecord, TransactionMonth};
pub use loader::{load_projects, load_projects_from_reader, projects_from_table, DETAIL_SHEET};
