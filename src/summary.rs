//! Aggregation views over enriched projects
//!
//! All views are recomputed from the record set on demand. Missing monetary
//! values are skipped when summing, never counted as zero.

use crate::aging::AgingCategory;
use crate::profit::{percent_of, EnrichedProject};
use crate::project::TransactionMonth;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Number of projects in one aging bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingCount {
    pub category: AgingCategory,
    pub count: usize,
}

/// Project counts per aging bucket, largest first.
///
/// Only buckets that occur are listed; ties keep bucket order.
pub fn aging_summary(records: &[EnrichedProject]) -> Vec<AgingCount> {
    let mut counts: BTreeMap<AgingCategory, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.aging.category).or_default() += 1;
    }

    let mut summary: Vec<AgingCount> = counts
        .into_iter()
        .map(|(category, count)| AgingCount { category, count })
        .collect();
    // Stable sort keeps bucket order among equal counts
    summary.sort_by(|a, b| b.count.cmp(&a.count));
    summary
}

/// Profit totals for one project name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectProfit {
    pub project_name: String,
    pub net_total_sale: Option<f64>,
    pub total_acquisition_cost: Option<f64>,
    pub profit_value: Option<f64>,
    pub profit_percent: Option<f64>,
}

/// Sum of the present values; `None` if there are none
fn sum_present<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    values
        .into_iter()
        .flatten()
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

/// Profit totals grouped by project name, in name order.
///
/// Records with a blank project name belong to no group and are skipped.
pub fn profit_by_project(records: &[EnrichedProject]) -> Vec<ProjectProfit> {
    let mut groups: BTreeMap<&str, Vec<&EnrichedProject>> = BTreeMap::new();
    for r in records {
        let name = r.project.project_name.trim();
        if name.is_empty() {
            continue;
        }
        groups.entry(name).or_default().push(r);
    }

    groups
        .into_iter()
        .map(|(name, rows)| {
            let net_total_sale = sum_present(rows.iter().map(|r| r.profit.net_total_sale));
            let total_acquisition_cost =
                sum_present(rows.iter().map(|r| r.profit.total_acquisition_cost));
            let profit_value = sum_present(rows.iter().map(|r| r.profit.profit_value));
            let profit_percent = match (profit_value, net_total_sale) {
                (Some(profit), Some(net)) => percent_of(profit, net),
                _ => None,
            };

            ProjectProfit {
                project_name: name.to_string(),
                net_total_sale,
                total_acquisition_cost,
                profit_value,
                profit_percent,
            }
        })
        .collect()
}

/// Distinct transaction months, ascending; records without one are skipped
pub fn valid_months(records: &[EnrichedProject]) -> Vec<TransactionMonth> {
    records
        .iter()
        .filter_map(|r| r.transaction_month)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Records registered in the given month
pub fn filter_by_month(records: &[EnrichedProject], month: TransactionMonth) -> Vec<&EnrichedProject> {
    records
        .iter()
        .filter(|r| r.transaction_month == Some(month))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aging::compute_aging;
    use crate::cost::{CostEntry, CostTable};
    use crate::profit::{compute_profit, DEFAULT_TAX_RATE};
    use crate::project::ProjectRecord;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn record(project: &str, registered: Option<NaiveDateTime>, product: &str, qty: f64) -> ProjectRecord {
        ProjectRecord {
            sales_name: "Andi".into(),
            date_register: registered,
            closing_date: None,
            customer: "PT Maju".into(),
            project_name: project.into(),
            product_type: product.into(),
            quantity: Some(qty),
            unit_price: Some(111.0),
        }
    }

    fn sample() -> Vec<EnrichedProject> {
        let records = vec![
            record("Gedung B", Some(date(2024, 4, 20)), "X", 1.0),
            record("Gedung A", Some(date(2024, 1, 1)), "X", 2.0),
            record("Gedung A", Some(date(2024, 1, 15)), "Y", 4.0),
            record("Gedung C", None, "X", 1.0),
            record("Gedung D", Some(date(2024, 4, 1)), "Y", 1.0),
            record("Gedung B", Some(date(2024, 4, 25)), "X", 1.0),
        ];
        let costs = CostTable::from_entries(&[CostEntry::new("X", 50.0)]);
        compute_profit(compute_aging(records, date(2024, 4, 30)), &costs, DEFAULT_TAX_RATE)
    }

    #[test]
    fn test_aging_summary_counts() {
        let summary = aging_summary(&sample());

        assert_eq!(
            summary,
            vec![
                AgingCount { category: AgingCategory::UpTo30Days, count: 3 },
                AgingCount { category: AgingCategory::Over90Days, count: 2 },
                AgingCount { category: AgingCategory::Unknown, count: 1 },
            ]
        );
        let total: usize = summary.iter().map(|c| c.count).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_profit_by_project_skips_missing() {
        let summary = profit_by_project(&sample());
        let names: Vec<&str> = summary.iter().map(|p| p.project_name.as_str()).collect();
        assert_eq!(names, vec!["Gedung A", "Gedung B", "Gedung C", "Gedung D"]);

        // Gedung A: only the "X" row has a cost; the "Y" row is left out
        let a = &summary[0];
        assert_relative_eq!(a.net_total_sale.unwrap(), 200.0, epsilon = 1e-9);
        assert_relative_eq!(a.total_acquisition_cost.unwrap(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(a.profit_value.unwrap(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(a.profit_percent.unwrap(), 50.0, epsilon = 1e-9);

        let b = &summary[1];
        assert_relative_eq!(b.net_total_sale.unwrap(), 200.0, epsilon = 1e-9);

        // Gedung D has no matched rows at all
        let d = &summary[3];
        assert_eq!(d.net_total_sale, None);
        assert_eq!(d.profit_value, None);
        assert_eq!(d.profit_percent, None);
    }

    #[test]
    fn test_profit_by_project_skips_blank_names() {
        let records = vec![
            record("Gedung A", Some(date(2024, 1, 1)), "X", 2.0),
            record("", Some(date(2024, 1, 2)), "X", 5.0),
            record("   ", Some(date(2024, 1, 3)), "X", 5.0),
        ];
        let costs = CostTable::from_entries(&[CostEntry::new("X", 50.0)]);
        let enriched = compute_profit(compute_aging(records, date(2024, 4, 30)), &costs, DEFAULT_TAX_RATE);

        let summary = profit_by_project(&enriched);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].project_name, "Gedung A");
        assert_relative_eq!(summary[0].net_total_sale.unwrap(), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_valid_months_sorted_without_missing() {
        let months: Vec<String> = valid_months(&sample()).iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2024-01", "2024-04"]);
    }

    #[test]
    fn test_filter_by_month() {
        let records = sample();
        let april = TransactionMonth::new(2024, 4).unwrap();
        let rows = filter_by_month(&records, april);

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.transaction_month == Some(april)));

        let march = TransactionMonth::new(2024, 3).unwrap();
        assert!(filter_by_month(&records, march).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(aging_summary(&[]).is_empty());
        assert!(profit_by_project(&[]).is_empty());
        assert!(valid_months(&[]).is_empty());
    }
}
