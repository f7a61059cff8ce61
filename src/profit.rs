//! Net-of-tax profit per project, joined against the product cost table

use crate::aging::{AgedProject, Aging};
use crate::cost::CostTable;
use crate::project::{ProjectRecord, TransactionMonth};
use serde::{Deserialize, Serialize};

/// Default sales tax (PPN) rate
pub const DEFAULT_TAX_RATE: f64 = 0.11;

/// Monetary fields derived for one project.
///
/// Every amount is `None` when the product has no entry in the cost table
/// or the record lacks a quantity or unit price.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Profit {
    /// Unit acquisition cost from the cost table
    pub acquisition_cost: Option<f64>,
    /// Unit price with tax backed out
    pub net_unit_price: Option<f64>,
    pub net_total_sale: Option<f64>,
    pub total_acquisition_cost: Option<f64>,
    pub profit_value: Option<f64>,
    /// Profit as a percentage of net sale; `None` when net sale is zero
    pub profit_percent: Option<f64>,
}

impl Profit {
    pub fn of(record: &ProjectRecord, acquisition_cost: Option<f64>, tax_rate: f64) -> Self {
        let (Some(cost), Some(quantity), Some(unit_price)) =
            (acquisition_cost, record.quantity, record.unit_price)
        else {
            return Self::default();
        };

        let net_unit_price = unit_price / (1.0 + tax_rate);
        let net_total_sale = net_unit_price * quantity;
        let total_acquisition_cost = cost * quantity;
        let profit_value = net_total_sale - total_acquisition_cost;

        Self {
            acquisition_cost: Some(cost),
            net_unit_price: Some(net_unit_price),
            net_total_sale: Some(net_total_sale),
            total_acquisition_cost: Some(total_acquisition_cost),
            profit_value: Some(profit_value),
            profit_percent: percent_of(profit_value, net_total_sale),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.acquisition_cost.is_some()
    }
}

/// `part / whole * 100`, or `None` when the ratio is undefined
pub fn percent_of(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        return None;
    }
    let pct = part / whole * 100.0;
    pct.is_finite().then_some(pct)
}

/// A project with aging and profit attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedProject {
    pub project: ProjectRecord,
    pub aging: Aging,
    pub profit: Profit,
    /// Registration month; `None` when the registration date is missing
    pub transaction_month: Option<TransactionMonth>,
}

/// Join aged projects against the cost table and compute profit.
///
/// Left join: every input project appears once in the output, in input
/// order, whether or not its product has a cost.
pub fn compute_profit(aged: Vec<AgedProject>, costs: &CostTable, tax_rate: f64) -> Vec<EnrichedProject> {
    let mut unmatched = 0usize;

    let enriched: Vec<EnrichedProject> = aged
        .into_iter()
        .map(|AgedProject { project, aging }| {
            let cost = costs.get(&project.product_type);
            if cost.is_none() {
                unmatched += 1;
                log::debug!("No cost for product '{}'", project.product_type);
            }

            let profit = Profit::of(&project, cost, tax_rate);
            let transaction_month = project.transaction_month();
            EnrichedProject {
                project,
                aging,
                profit,
                transaction_month,
            }
        })
        .collect();

    if unmatched > 0 {
        log::warn!(
            "{} of {} projects have no matching product cost",
            unmatched,
            enriched.len()
        );
    }

    enriched
}
