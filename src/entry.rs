//! Manual project entry
//!
//! Validates a hand-entered project into an ordinary [`ProjectRecord`].
//! Nothing here stores the record; persisting it is left to whoever embeds
//! the library.

use crate::error::{ReportError, Result};
use crate::project::ProjectRecord;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub sales_name: String,
    pub date_register: NaiveDate,
    pub customer: String,
    pub project_name: String,
    pub product_type: String,
    /// At least 1
    pub quantity: u32,
    /// Tax-inclusive unit price, at least 0
    pub unit_price: f64,
}

impl ProjectEntry {
    pub fn validate(&self) -> Result<ProjectRecord> {
        if self.quantity < 1 {
            return Err(ReportError::InvalidEntry("quantity must be at least 1".into()));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(ReportError::InvalidEntry(format!(
                "unit price must be a non-negative amount, got {}",
                self.unit_price
            )));
        }

        Ok(ProjectRecord {
            sales_name: self.sales_name.trim().to_string(),
            date_register: Some(self.date_register.and_time(NaiveTime::MIN)),
            closing_date: None,
            customer: self.customer.trim().to_string(),
            project_name: self.project_name.trim().to_string(),
            product_type: self.product_type.trim().to_string(),
            quantity: Some(f64::from(self.quantity)),
            unit_price: Some(self.unit_price),
        })
    }
}
