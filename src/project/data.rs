//! Project record structure matching the "Detail Pipeline" sheet

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single project row from the pipeline detail sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Salesperson responsible for the project
    pub sales_name: String,

    /// When the project was registered (None if the cell could not be parsed)
    pub date_register: Option<NaiveDateTime>,

    /// When the project was closed (None while still open)
    pub closing_date: Option<NaiveDateTime>,

    pub customer: String,

    pub project_name: String,

    /// Product type, used as the key into the cost table
    pub product_type: String,

    /// Quantity ordered (None if the cell is blank or not a number)
    pub quantity: Option<f64>,

    /// Unit sale price, tax inclusive (None if the cell is blank or not a number)
    pub unit_price: Option<f64>,
}

impl ProjectRecord {
    /// Whether the project has a closing date
    pub fn is_closed(&self) -> bool {
        self.closing_date.is_some()
    }

    /// Transaction month of the registration date
    pub fn transaction_month(&self) -> Option<TransactionMonth> {
        self.date_register.map(TransactionMonth::from_datetime)
    }
}

/// Calendar year-month used for monthly filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionMonth {
    pub year: i32,
    pub month: u32,
}

impl TransactionMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Truncate a date-time to its calendar month
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    /// Parse a `YYYY-MM` key
    pub fn parse(key: &str) -> Option<Self> {
        let (year, month) = key.trim().split_once('-')?;
        if month.len() != 2 {
            return None;
        }
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }
}

impl fmt::Display for TransactionMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
