use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Category, TripDetail};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    pub count: usize,
}

/// Spend against budget for one trip, built from an already reconciled
/// [`TripDetail`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub trip_id: String,
    pub budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
    /// 0 when the budget is zero or negative.
    pub percent_used: f64,
    pub over_budget: bool,
    pub by_category: Vec<CategoryTotal>,
}

impl BudgetSummary {
    pub fn from_detail(detail: &TripDetail) -> Self {
        let trip = &detail.trip.record;

        let mut totals: BTreeMap<Category, CategoryTotal> = BTreeMap::new();
        for item in detail.itineraries.iter().map(|stored| &stored.record) {
            let entry = totals.entry(item.category).or_insert(CategoryTotal {
                category: item.category,
                total: 0.0,
                count: 0,
            });
            entry.total += item.price;
            entry.count += 1;
        }
        let mut by_category: Vec<_> = totals.into_values().collect();
        by_category.sort_by(|a, b| b.total.total_cmp(&a.total));

        let percent_used = if trip.budget > 0.0 {
            trip.total_spent / trip.budget * 100.0
        } else {
            0.0
        };

        Self {
            trip_id: trip.id.clone(),
            budget: trip.budget,
            total_spent: trip.total_spent,
            remaining: trip.budget - trip.total_spent,
            percent_used,
            over_budget: trip.total_spent > trip.budget,
            by_category,
        }
    }
}

/// Totals across every trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub trip_count: usize,
    pub item_count: usize,
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
}

impl BudgetOverview {
    pub fn from_details(details: &[TripDetail]) -> Self {
        let mut overview = details.iter().fold(Self::default(), |mut acc, detail| {
            acc.trip_count += 1;
            acc.item_count += detail.itineraries.len();
            acc.total_budget += detail.trip.record.budget;
            acc.total_spent += detail.trip.record.total_spent;
            acc
        });
        overview.remaining = overview.total_budget - overview.total_spent;
        overview
    }
}
