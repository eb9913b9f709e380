use crate::config::TierThresholds;
use crate::models::itinerary::{BudgetRow, BudgetTable};
use serde_json::Value;
use std::fmt;

/// Coarse spending level derived from a total trip amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTier {
    Unspecified,
    Budget,
    MidRange,
    Luxury,
}

impl BudgetTier {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetTier::Unspecified => "",
            BudgetTier::Budget => "Budget",
            BudgetTier::MidRange => "Mid-range",
            BudgetTier::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five standard categories used when no usable table is supplied.
pub fn default_budget() -> BudgetTable {
    BudgetTable {
        rows: vec![
            BudgetRow::new("Accommodation", 200.0, 300.0, 500.0),
            BudgetRow::new("Food", 150.0, 250.0, 400.0),
            BudgetRow::new("Transportation", 50.0, 100.0, 200.0),
            BudgetRow::new("Activities", 100.0, 200.0, 300.0),
            BudgetRow::new("Souvenirs", 50.0, 100.0, 200.0),
        ],
    }
}

/// Accepts `source` when its `rows` is a non-empty array, else the default table.
///
/// Row values that are not numbers (or numeric strings) become zero.
pub fn resolve_budget(source: Option<&Value>) -> BudgetTable {
    let rows = source
        .and_then(|budget| budget.get("rows"))
        .and_then(Value::as_array)
        .filter(|rows| !rows.is_empty());

    match rows {
        Some(rows) => BudgetTable {
            rows: rows.iter().map(row_from_value).collect(),
        },
        None => default_budget(),
    }
}

fn row_from_value(row: &Value) -> BudgetRow {
    BudgetRow {
        category: row
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        budget: coerce_amount(row.get("budget")),
        mid: coerce_amount(row.get("mid")),
        luxury: coerce_amount(row.get("luxury")),
    }
}

/// Numbers pass through, numeric strings are parsed, anything else is zero.
pub fn coerce_amount(value: Option<&Value>) -> f64 {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

/// Tier for a total in USD. Each bound is inclusive.
pub fn tier_from_amount(amount_usd: Option<f64>, thresholds: &TierThresholds) -> BudgetTier {
    let amount = amount_usd.filter(|a| a.is_finite()).unwrap_or(0.0);

    if amount <= 0.0 {
        BudgetTier::Unspecified
    } else if amount <= thresholds.budget_max {
        BudgetTier::Budget
    } else if amount <= thresholds.mid_range_max {
        BudgetTier::MidRange
    } else {
        BudgetTier::Luxury
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tier(amount: f64) -> &'static str {
        tier_from_amount(Some(amount), &TierThresholds::default()).label()
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier(1500.0), "Budget");
        assert_eq!(tier(1500.01), "Mid-range");
        assert_eq!(tier(4000.0), "Mid-range");
        assert_eq!(tier(4000.01), "Luxury");
        assert_eq!(tier(0.0), "");
        assert_eq!(tier(1.0), "Budget");
    }

    #[test]
    fn test_missing_or_malformed_amount_is_unspecified() {
        let thresholds = TierThresholds::default();
        assert_eq!(tier_from_amount(None, &thresholds), BudgetTier::Unspecified);
        assert_eq!(tier_from_amount(Some(f64::NAN), &thresholds), BudgetTier::Unspecified);
        assert_eq!(tier_from_amount(Some(-20.0), &thresholds), BudgetTier::Unspecified);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = TierThresholds {
            budget_max: 100.0,
            mid_range_max: 200.0,
        };
        assert_eq!(tier_from_amount(Some(150.0), &thresholds), BudgetTier::MidRange);
        assert_eq!(tier_from_amount(Some(201.0), &thresholds), BudgetTier::Luxury);
    }

    #[test]
    fn test_missing_budget_falls_back_to_defaults() {
        let table = resolve_budget(None);
        let categories: Vec<&str> = table.rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(
            categories,
            vec!["Accommodation", "Food", "Transportation", "Activities", "Souvenirs"]
        );
        assert_eq!(table.rows[1], BudgetRow::new("Food", 150.0, 250.0, 400.0));
    }

    #[test]
    fn test_empty_or_malformed_rows_fall_back_to_defaults() {
        for source in [json!({}), json!({ "rows": [] }), json!({ "rows": "lots" }), json!(12)] {
            assert_eq!(resolve_budget(Some(&source)), default_budget());
        }
    }

    #[test]
    fn test_supplied_rows_are_accepted() {
        let source = json!({
            "rows": [
                { "category": "Ryokan", "budget": 120, "mid": "240", "luxury": "lots" }
            ]
        });

        let table = resolve_budget(Some(&source));

        assert_eq!(table.rows, vec![BudgetRow::new("Ryokan", 120.0, 240.0, 0.0)]);
    }

    #[test]
    fn test_resolving_the_default_is_idempotent() {
        let once = resolve_budget(None);
        let as_json = serde_json::to_value(&once).unwrap();
        let twice = resolve_budget(Some(&as_json));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_default_totals() {
        let totals = default_budget().totals();
        assert_eq!(totals.budget, 550.0);
        assert_eq!(totals.mid, 950.0);
        assert_eq!(totals.luxury, 1600.0);
    }
}
