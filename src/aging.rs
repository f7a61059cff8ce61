//! Project aging: elapsed days since registration and their buckets

use crate::project::ProjectRecord;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aging bucket of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgingCategory {
    /// 30 days or less (including negative day counts)
    UpTo30Days,
    /// 31 to 90 days
    From31To90Days,
    /// More than 90 days
    Over90Days,
    /// Registration date missing
    Unknown,
}

impl AgingCategory {
    pub const ALL: [AgingCategory; 4] = [
        AgingCategory::UpTo30Days,
        AgingCategory::From31To90Days,
        AgingCategory::Over90Days,
        AgingCategory::Unknown,
    ];

    /// Bucket a day count; boundaries at 30 and 90 are inclusive
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            None => AgingCategory::Unknown,
            Some(d) if d <= 30 => AgingCategory::UpTo30Days,
            Some(d) if d <= 90 => AgingCategory::From31To90Days,
            Some(_) => AgingCategory::Over90Days,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgingCategory::UpTo30Days => "≤30 Days",
            AgingCategory::From31To90Days => "31–90 Days",
            AgingCategory::Over90Days => ">90 Days",
            AgingCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AgingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row classification used when displaying the detail table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowHighlight {
    /// Project has a closing date
    Closed,
    /// Open project aged more than 90 days
    Overdue,
    Normal,
}

impl RowHighlight {
    pub fn classify(record: &ProjectRecord, days: Option<i64>) -> Self {
        if record.is_closed() {
            RowHighlight::Closed
        } else if days.is_some_and(|d| d > 90) {
            RowHighlight::Overdue
        } else {
            RowHighlight::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowHighlight::Closed => "closed",
            RowHighlight::Overdue => "overdue",
            RowHighlight::Normal => "",
        }
    }
}

/// Aging fields derived for one project
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aging {
    /// Whole days from registration to closing (or to now if open).
    /// Negative when the closing date precedes registration.
    pub days: Option<i64>,
    pub category: AgingCategory,
    pub highlight: RowHighlight,
}

impl Aging {
    /// Age one record against the reference instant
    pub fn of(record: &ProjectRecord, now: NaiveDateTime) -> Self {
        let days = record.date_register.map(|registered| {
            let end = record.closing_date.unwrap_or(now);
            // num_days truncates toward zero
            (end - registered).num_days()
        });

        Self {
            days,
            category: AgingCategory::from_days(days),
            highlight: RowHighlight::classify(record, days),
        }
    }
}

/// A project with its aging attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgedProject {
    pub project: ProjectRecord,
    pub aging: Aging,
}

/// Attach aging to every record, measuring open projects up to `now`
pub fn compute_aging(records: Vec<ProjectRecord>, now: NaiveDateTime) -> Vec<AgedProject> {
    let aged: Vec<AgedProject> = records
        .into_iter()
        .map(|project| {
            let aging = Aging::of(&project, now);
            AgedProject { project, aging }
        })
        .collect();

    let unknown = aged
        .iter()
        .filter(|a| a.aging.category == AgingCategory::Unknown)
        .count();
    if unknown > 0 {
        log::warn!("{} of {} projects have unknown aging", unknown, aged.len());
    }

    aged
}

/// Attach aging measured against the current local time
pub fn compute_aging_now(records: Vec<ProjectRecord>) -> Vec<AgedProject> {
    compute_aging(records, Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn record(registered: Option<NaiveDateTime>, closed: Option<NaiveDateTime>) -> ProjectRecord {
        ProjectRecord {
            sales_name: "Andi".into(),
            date_register: registered,
            closing_date: closed,
            customer: "PT Maju".into(),
            project_name: "Gedung A".into(),
            product_type: "X".into(),
            quantity: Some(1.0),
            unit_price: Some(111.0),
        }
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(AgingCategory::from_days(Some(30)), AgingCategory::UpTo30Days);
        assert_eq!(AgingCategory::from_days(Some(31)), AgingCategory::From31To90Days);
        assert_eq!(AgingCategory::from_days(Some(90)), AgingCategory::From31To90Days);
        assert_eq!(AgingCategory::from_days(Some(91)), AgingCategory::Over90Days);
        assert_eq!(AgingCategory::from_days(Some(0)), AgingCategory::UpTo30Days);
        assert_eq!(AgingCategory::from_days(None), AgingCategory::Unknown);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AgingCategory::UpTo30Days.to_string(), "≤30 Days");
        assert_eq!(AgingCategory::From31To90Days.to_string(), "31–90 Days");
        assert_eq!(AgingCategory::Over90Days.to_string(), ">90 Days");
        assert_eq!(AgingCategory::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_open_project_ages_to_now() {
        let aging = Aging::of(&record(Some(date(2024, 1, 1)), None), date(2024, 4, 30));
        assert_eq!(aging.days, Some(120));
        assert_eq!(aging.category, AgingCategory::Over90Days);
        assert_eq!(aging.highlight, RowHighlight::Overdue);
    }

    #[test]
    fn test_closed_project_ages_to_closing() {
        let now = date(2030, 1, 1);
        let aging = Aging::of(&record(Some(date(2024, 1, 1)), Some(date(2024, 2, 15))), now);
        assert_eq!(aging.days, Some(45));
        assert_eq!(aging.category, AgingCategory::From31To90Days);
        assert_eq!(aging.highlight, RowHighlight::Closed);
    }

    #[test]
    fn test_partial_days_truncate() {
        let now = date(2024, 1, 31) + Duration::hours(23);
        let aging = Aging::of(&record(Some(date(2024, 1, 1)), None), now);
        assert_eq!(aging.days, Some(30));
        assert_eq!(aging.category, AgingCategory::UpTo30Days);
    }

    #[test]
    fn test_negative_aging_is_kept() {
        let aging = Aging::of(
            &record(Some(date(2024, 3, 10)), Some(date(2024, 3, 1))),
            date(2024, 4, 30),
        );
        assert_eq!(aging.days, Some(-9));
        assert_eq!(aging.category, AgingCategory::UpTo30Days);
    }

    #[test]
    fn test_missing_registration_is_unknown() {
        let aging = Aging::of(&record(None, Some(date(2024, 3, 1))), date(2024, 4, 30));
        assert_eq!(aging.days, None);
        assert_eq!(aging.category, AgingCategory::Unknown);
        // Closed rows are still highlighted as closed
        assert_eq!(aging.highlight, RowHighlight::Closed);
    }

    #[test]
    fn test_compute_aging_keeps_order_and_count() {
        let records = vec![
            record(Some(date(2024, 4, 20)), None),
            record(None, None),
            record(Some(date(2023, 1, 1)), Some(date(2023, 2, 1))),
        ];
        let aged = compute_aging(records.clone(), date(2024, 4, 30));

        assert_eq!(aged.len(), 3);
        for (a, r) in aged.iter().zip(&records) {
            assert_eq!(&a.project, r);
        }
        assert_eq!(aged[0].aging.days, Some(10));
        assert_eq!(aged[0].aging.highlight, RowHighlight::Normal);
        assert_eq!(aged[1].aging.category, AgingCategory::Unknown);
        assert_eq!(aged[2].aging.days, Some(31));
    }

    #[test]
    fn test_compute_aging_now_tracks_clock() {
        let registered = Local::now().naive_local() - Duration::days(10);
        let aged = compute_aging_now(vec![record(Some(registered), None)]);
        // Allow for the clock ticking over midnight between the two reads
        let days = aged[0].aging.days.unwrap();
        assert!((10..=11).contains(&days));
    }
}
