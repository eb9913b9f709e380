use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of a trip. `index` is zero-based and fixes the day number shown in `title`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub index: usize,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRow {
    pub category: String,
    pub budget: f64,
    pub mid: f64,
    pub luxury: f64,
}

impl BudgetRow {
    pub fn new(category: &str, budget: f64, mid: f64, luxury: f64) -> Self {
        Self {
            category: category.to_string(),
            budget,
            mid,
            luxury,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTable {
    pub rows: Vec<BudgetRow>,
}

/// Column sums of a `BudgetTable`. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BudgetTotals {
    pub budget: f64,
    pub mid: f64,
    pub luxury: f64,
}

impl BudgetTable {
    pub fn totals(&self) -> BudgetTotals {
        self.rows
            .iter()
            .fold(BudgetTotals::default(), |acc, row| BudgetTotals {
                budget: acc.budget + row.budget,
                mid: acc.mid + row.mid,
                luxury: acc.luxury + row.luxury,
            })
    }
}

/// A normalized, display-ready trip plan. Built per planning request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub trip_title: String,
    pub days: Vec<DayPlan>,
    // Request echoes below are display-only; exported itineraries may omit them
    #[serde(default)]
    pub budget: Option<BudgetTable>,
    #[serde(default)]
    pub travelers: Option<u32>,
    #[serde(default)]
    pub days_count: usize,
    #[serde(default)]
    pub budget_tier: String,
    #[serde(rename = "budgetUSD", default)]
    pub budget_usd: Option<f64>,
    /// Free text returned by the generation service when it gave no structured payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}
