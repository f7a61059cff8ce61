//! Report runner: aging followed by profit over a loaded dataset
//!
//! Builds the cost table once, then allows re-running the pipeline over
//! any set of project records (e.g. the loaded sheet plus a manual entry)
//! without rebuilding the lookup.

use crate::aging::compute_aging;
use crate::cost::CostTable;
use crate::profit::{compute_profit, EnrichedProject, DEFAULT_TAX_RATE};
use crate::project::ProjectRecord;
use crate::repository::Dataset;
use chrono::{Local, NaiveDateTime};

#[derive(Debug, Clone)]
pub struct ReportRunner {
    costs: CostTable,
    tax_rate: f64,
}

impl ReportRunner {
    pub fn new(costs: CostTable, tax_rate: f64) -> Self {
        Self { costs, tax_rate }
    }

    /// Runner with the cost table built from a loaded dataset
    pub fn from_dataset(dataset: &Dataset, tax_rate: f64) -> Self {
        Self::new(dataset.cost_table(), tax_rate)
    }

    /// Age and price the given projects as of `now`
    pub fn run(&self, projects: Vec<ProjectRecord>, now: NaiveDateTime) -> Vec<EnrichedProject> {
        let aged = compute_aging(projects, now);
        compute_profit(aged, &self.costs, self.tax_rate)
    }

    /// Age and price the given projects as of the current local time
    pub fn run_now(&self, projects: Vec<ProjectRecord>) -> Vec<EnrichedProject> {
        self.run(projects, Local::now().naive_local())
    }

    pub fn costs(&self) -> &CostTable {
        &self.costs
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }
}

impl Default for ReportRunner {
    fn default() -> Self {
        Self::new(CostTable::default(), DEFAULT_TAX_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aging::AgingCategory;
    use crate::cost::CostEntry;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset {
            projects: vec![ProjectRecord {
                sales_name: "Andi".into(),
                date_register: Some(date(2024, 1, 1)),
                closing_date: None,
                customer: "PT Maju".into(),
                project_name: "Gedung A".into(),
                product_type: "X".into(),
                quantity: Some(2.0),
                unit_price: Some(111.0),
            }],
            cost_entries: vec![CostEntry::new("X", 50.0), CostEntry::new("X", 80.0)],
        }
    }

    #[test]
    fn test_runner_end_to_end() {
        let data = dataset();
        let runner = ReportRunner::from_dataset(&data, DEFAULT_TAX_RATE);
        let out = runner.run(data.projects.clone(), date(2024, 4, 30));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].aging.days, Some(120));
        assert_eq!(out[0].aging.category, AgingCategory::Over90Days);
        assert_relative_eq!(out[0].profit.profit_value.unwrap(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(out[0].profit.profit_percent.unwrap(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_runner_reruns_without_rebuilding() {
        let data = dataset();
        let runner = ReportRunner::from_dataset(&data, DEFAULT_TAX_RATE);
        assert_eq!(runner.costs().len(), 1);

        let earlier = runner.run(data.projects.clone(), date(2024, 1, 20));
        let later = runner.run(data.projects.clone(), date(2024, 4, 30));
        assert_eq!(earlier[0].aging.category, AgingCategory::UpTo30Days);
        assert_eq!(later[0].aging.category, AgingCategory::Over90Days);
        assert_eq!(earlier[0].profit, later[0].profit);
    }

    #[test]
    fn test_default_runner_matches_nothing() {
        let runner = ReportRunner::default();
        assert_eq!(runner.tax_rate(), DEFAULT_TAX_RATE);

        let out = runner.run_now(dataset().projects);
        assert!(!out[0].profit.is_matched());
    }
}
