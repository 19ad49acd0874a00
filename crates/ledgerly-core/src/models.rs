//! Domain models for Ledgerly

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::period::WeekKey;

/// Lenient amount deserializer: numbers pass through, numeric strings are
/// parsed, and anything else (null, malformed text, NaN) becomes 0.0.
///
/// Budget fields historically arrived from free-form inputs, so malformed
/// values are coerced rather than rejected. The coercion happens here, at the
/// schema boundary, so every downstream computation sees a plain f64.
fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

/// Lenient deserializer for optional amounts (patch fields). Absent and
/// null both mean "leave unchanged"; present values are coerced.
fn lenient_amount_opt<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| coerce_amount(&v)))
}

/// `Number(x) || 0` semantics for a JSON value.
pub fn coerce_amount(value: &serde_json::Value) -> f64 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// One weekly budget record - the six spending categories plus income.
///
/// All amount fields default to 0 when absent. `month` is a denormalized
/// display label, not derived from the week number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeeklyBudget {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub money_in: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub daily_expenses: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub investments: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub big_purchases: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub savings: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub leisure_development: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub charity: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub month: String,
}

impl WeeklyBudget {
    /// Sum of the six expense-like categories.
    pub fn total_out(&self) -> f64 {
        self.daily_expenses
            + self.investments
            + self.big_purchases
            + self.savings
            + self.leisure_development
            + self.charity
    }

    /// Income minus total outgoings. Negative means the week ran over budget.
    pub fn balance(&self) -> f64 {
        self.money_in - self.total_out()
    }
}

/// Field-level patch for a weekly merge save: only present fields are
/// written, everything else keeps its stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyPatch {
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    pub money_in: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    pub daily_expenses: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    pub investments: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    pub big_purchases: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    pub savings: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    pub leisure_development: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    pub charity: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
}

impl WeeklyPatch {
    /// Apply this patch on top of an existing record.
    pub fn apply(&self, base: &WeeklyBudget) -> WeeklyBudget {
        WeeklyBudget {
            money_in: self.money_in.unwrap_or(base.money_in),
            daily_expenses: self.daily_expenses.unwrap_or(base.daily_expenses),
            investments: self.investments.unwrap_or(base.investments),
            big_purchases: self.big_purchases.unwrap_or(base.big_purchases),
            savings: self.savings.unwrap_or(base.savings),
            leisure_development: self.leisure_development.unwrap_or(base.leisure_development),
            charity: self.charity.unwrap_or(base.charity),
            notes: self.notes.clone().unwrap_or_else(|| base.notes.clone()),
            month: self.month.clone().unwrap_or_else(|| base.month.clone()),
        }
    }

    /// Patch that sets every field (a full save expressed as a merge).
    pub fn from_budget(budget: &WeeklyBudget) -> Self {
        Self {
            money_in: Some(budget.money_in),
            daily_expenses: Some(budget.daily_expenses),
            investments: Some(budget.investments),
            big_purchases: Some(budget.big_purchases),
            savings: Some(budget.savings),
            leisure_development: Some(budget.leisure_development),
            charity: Some(budget.charity),
            notes: Some(budget.notes.clone()),
            month: Some(budget.month.clone()),
        }
    }
}

/// A stored weekly record with its period key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyRecord {
    pub year: i32,
    pub week: u32,
    #[serde(flatten)]
    pub budget: WeeklyBudget,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WeeklyRecord {
    pub fn key(&self) -> WeekKey {
        WeekKey {
            year: self.year,
            week: self.week,
        }
    }
}

/// One monthly planning record. Saved with full-replace semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MonthlyBudget {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub planned_income: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub planned_expenses: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub planned_investments: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub planned_savings: f64,
    #[serde(default)]
    pub notes: String,
}

impl MonthlyBudget {
    /// Income remaining after all planned allocations.
    pub fn planned_balance(&self) -> f64 {
        self.planned_income - self.planned_expenses - self.planned_investments
            - self.planned_savings
    }
}

/// Per-category yearly totals across the six weekly spending categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub daily_expenses: f64,
    pub investments: f64,
    pub big_purchases: f64,
    pub savings: f64,
    pub leisure_development: f64,
    pub charity: f64,
}

impl CategoryTotals {
    /// (label, total) pairs in display order.
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("savings", self.savings),
            ("investments", self.investments),
            ("leisure_development", self.leisure_development),
            ("charity", self.charity),
            ("daily_expenses", self.daily_expenses),
            ("big_purchases", self.big_purchases),
        ]
    }
}

/// One point in the month-bucketed income/savings series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: String,
    pub income: f64,
    pub savings: f64,
}

/// Share of one category in the yearly spending distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
}

/// Advisory alert kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// More than two weeks in the year ran a negative balance
    NegativeBalance,
    /// Average savings positive but below 10% of average income
    LowSavingsRate,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NegativeBalance => "negative_balance",
            Self::LowSavingsRate => "low_savings_rate",
        }
    }
}

impl std::str::FromStr for AlertKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "negative_balance" => Ok(Self::NegativeBalance),
            "low_savings_rate" => Ok(Self::LowSavingsRate),
            _ => Err(format!("Unknown alert kind: {}", s)),
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An advisory budget alert. Text only - alerts carry no side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub kind: AlertKind,
    pub message: String,
}

/// Yearly aggregate over weekly records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    /// Number of weeks with a record this year
    pub weeks_tracked: usize,
    pub income_total: f64,
    pub totals: CategoryTotals,
    /// Per-category means; all zero when no weeks are tracked
    pub means: CategoryTotals,
    pub avg_weekly_income: f64,
    pub negative_balance_weeks: usize,
}

/// The in-memory dashboard aggregate. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub year: i32,
    pub weeks_tracked: usize,
    pub avg_weekly_income: f64,
    pub avg_weekly_savings: f64,
    pub total_savings: f64,
    pub total_charity: f64,
    pub total_leisure_development: f64,
    pub negative_balance_weeks: usize,
    pub monthly_series: Vec<MonthlyPoint>,
    /// Categories with a zero total are excluded
    pub category_shares: Vec<CategoryShare>,
    /// None = no baseline ("new") - last year absent or averaged zero
    pub income_delta_pct: Option<f64>,
    pub savings_delta_pct: Option<f64>,
    pub alerts: Vec<BudgetAlert>,
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_budget_totals() {
        let budget = WeeklyBudget {
            money_in: 1000.0,
            daily_expenses: 200.0,
            savings: 300.0,
            ..Default::default()
        };
        assert_eq!(budget.total_out(), 500.0);
        assert_eq!(budget.balance(), 500.0);
    }

    #[test]
    fn balance_is_linear_in_income() {
        let base = WeeklyBudget {
            daily_expenses: 120.0,
            charity: 30.0,
            ..Default::default()
        };
        let mut a = base.clone();
        a.money_in = 700.0;
        let mut b = base;
        b.money_in = 450.0;
        assert_eq!(a.balance() - b.balance(), 700.0 - 450.0);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let budget: WeeklyBudget =
            serde_json::from_str(r#"{"money_in": 500, "savings": 100}"#).unwrap();
        assert_eq!(budget.money_in, 500.0);
        assert_eq!(budget.savings, 100.0);
        assert_eq!(budget.daily_expenses, 0.0);
        assert_eq!(budget.total_out(), 100.0);
        assert_eq!(budget.notes, "");
    }

    #[test]
    fn malformed_amounts_coerce_to_zero() {
        let budget: WeeklyBudget = serde_json::from_str(
            r#"{"money_in": "250.5", "savings": "not a number", "charity": null}"#,
        )
        .unwrap();
        assert_eq!(budget.money_in, 250.5);
        assert_eq!(budget.savings, 0.0);
        assert_eq!(budget.charity, 0.0);
    }

    #[test]
    fn patch_merges_over_base() {
        let base = WeeklyBudget {
            money_in: 800.0,
            savings: 150.0,
            notes: "groceries ran high".to_string(),
            ..Default::default()
        };
        let patch = WeeklyPatch {
            savings: Some(200.0),
            ..Default::default()
        };
        let merged = patch.apply(&base);
        assert_eq!(merged.savings, 200.0);
        assert_eq!(merged.money_in, 800.0);
        assert_eq!(merged.notes, "groceries ran high");
    }

    #[test]
    fn patch_amounts_coerce_like_full_records() {
        let patch: WeeklyPatch =
            serde_json::from_str(r#"{"savings": "200", "charity": "oops"}"#).unwrap();
        assert_eq!(patch.savings, Some(200.0));
        assert_eq!(patch.charity, Some(0.0));
        assert_eq!(patch.money_in, None);
    }

    #[test]
    fn monthly_planned_balance() {
        let budget = MonthlyBudget {
            planned_income: 4000.0,
            planned_expenses: 2500.0,
            planned_investments: 500.0,
            planned_savings: 800.0,
            notes: String::new(),
        };
        assert_eq!(budget.planned_balance(), 200.0);

        let shortfall = MonthlyBudget {
            planned_income: 1000.0,
            planned_expenses: 1500.0,
            ..Default::default()
        };
        assert!(shortfall.planned_balance() < 0.0);
    }

    #[test]
    fn alert_kind_string_round_trip() {
        for kind in [AlertKind::NegativeBalance, AlertKind::LowSavingsRate] {
            let parsed: AlertKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert!("overspent".parse::<AlertKind>().is_err());

        // Wire form matches the string form
        let json = serde_json::to_string(&AlertKind::LowSavingsRate).unwrap();
        assert_eq!(json, "\"low_savings_rate\"");
    }
}
