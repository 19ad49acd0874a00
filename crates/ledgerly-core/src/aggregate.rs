//! Budget aggregation: yearly summaries, monthly series, advisory alerts
//!
//! Every operation here is a pure function of the records passed in. The
//! record store hands back weekly records newest-first; `dashboard_summary`
//! re-sorts them chronologically before computing anything.

use crate::models::{
    BudgetAlert, AlertKind, CategoryShare, CategoryTotals, DashboardSummary, MonthlyPoint,
    WeeklyRecord, YearSummary,
};

/// Weeks-in-the-red threshold before the negative balance alert fires.
const NEGATIVE_BALANCE_ALERT_THRESHOLD: usize = 2;

/// Savings below this share of income triggers the low savings alert.
const LOW_SAVINGS_RATE: f64 = 0.10;

/// Aggregate one calendar year of weekly records.
///
/// Means are 0 when no weeks are tracked - never a division by zero.
pub fn aggregate_year(records: &[WeeklyRecord], year: i32) -> YearSummary {
    let mut summary = YearSummary {
        year,
        ..Default::default()
    };

    for record in records.iter().filter(|r| r.year == year) {
        let b = &record.budget;
        summary.weeks_tracked += 1;
        summary.income_total += b.money_in;
        summary.totals.daily_expenses += b.daily_expenses;
        summary.totals.investments += b.investments;
        summary.totals.big_purchases += b.big_purchases;
        summary.totals.savings += b.savings;
        summary.totals.leisure_development += b.leisure_development;
        summary.totals.charity += b.charity;
        if b.balance() < 0.0 {
            summary.negative_balance_weeks += 1;
        }
    }

    if summary.weeks_tracked > 0 {
        let n = summary.weeks_tracked as f64;
        summary.avg_weekly_income = summary.income_total / n;
        summary.means = CategoryTotals {
            daily_expenses: summary.totals.daily_expenses / n,
            investments: summary.totals.investments / n,
            big_purchases: summary.totals.big_purchases / n,
            savings: summary.totals.savings / n,
            leisure_development: summary.totals.leisure_development / n,
            charity: summary.totals.charity / n,
        };
    }

    summary
}

/// Month-bucketed income/savings series for one year.
///
/// Buckets by the month of `Jan 1 + (week-1)*7 days`, which is an
/// approximation of the true week-to-month mapping. Good enough for a trend
/// chart, not for reconciliation. Entries sharing a month label are merged
/// by summing; ordering follows the (chronologically sorted) input.
pub fn monthly_series(records: &[WeeklyRecord], year: i32) -> Vec<MonthlyPoint> {
    let mut series: Vec<MonthlyPoint> = Vec::new();

    for record in records.iter().filter(|r| r.year == year) {
        let Some(start) = record.key().approximate_start() else {
            continue;
        };
        let label = start.format("%b").to_string();

        match series.iter_mut().find(|p| p.month == label) {
            Some(point) => {
                point.income += record.budget.money_in;
                point.savings += record.budget.savings;
            }
            None => series.push(MonthlyPoint {
                month: label,
                income: record.budget.money_in,
                savings: record.budget.savings,
            }),
        }
    }

    series
}

/// Year-over-year percentage change. `None` means "no baseline" - last
/// year is absent or averaged zero, so a percentage would be meaningless.
pub fn year_over_year_delta(this_year_avg: f64, last_year_avg: f64) -> Option<f64> {
    if last_year_avg == 0.0 {
        None
    } else {
        Some((this_year_avg / last_year_avg - 1.0) * 100.0)
    }
}

/// Category spending distribution, zero-total categories excluded.
pub fn category_shares(totals: &CategoryTotals) -> Vec<CategoryShare> {
    totals
        .entries()
        .iter()
        .filter(|(_, total)| *total > 0.0)
        .map(|(category, total)| CategoryShare {
            category: (*category).to_string(),
            total: *total,
        })
        .collect()
}

/// Advisory alerts derived from a yearly summary. Text only, no side effects.
pub fn budget_alerts(summary: &YearSummary) -> Vec<BudgetAlert> {
    let mut alerts = Vec::new();

    if summary.negative_balance_weeks > NEGATIVE_BALANCE_ALERT_THRESHOLD {
        alerts.push(BudgetAlert {
            kind: AlertKind::NegativeBalance,
            message: format!(
                "You had negative balance in {} weeks this year. Consider reviewing spending patterns.",
                summary.negative_balance_weeks
            ),
        });
    }

    let avg_savings = summary.means.savings;
    let avg_income = summary.avg_weekly_income;
    if avg_savings > 0.0 && avg_savings < avg_income * LOW_SAVINGS_RATE {
        alerts.push(BudgetAlert {
            kind: AlertKind::LowSavingsRate,
            message: format!(
                "Your average weekly savings is only {:.1}% of income. Aim for at least 20%!",
                avg_savings / avg_income * 100.0
            ),
        });
    }

    alerts
}

/// Build the full dashboard aggregate from raw weekly records.
///
/// Accepts records in any order (the store returns them newest-first) and
/// sorts them chronologically ascending before aggregating.
pub fn dashboard_summary(records: &[WeeklyRecord], year: i32) -> DashboardSummary {
    let mut sorted: Vec<WeeklyRecord> = records.to_vec();
    sorted.sort_by_key(|r| (r.year, r.week));

    let this_year = aggregate_year(&sorted, year);
    let last_year = aggregate_year(&sorted, year - 1);

    let income_delta_pct = if last_year.weeks_tracked == 0 {
        None
    } else {
        year_over_year_delta(this_year.avg_weekly_income, last_year.avg_weekly_income)
    };
    let savings_delta_pct = if last_year.weeks_tracked == 0 {
        None
    } else {
        year_over_year_delta(this_year.means.savings, last_year.means.savings)
    };

    DashboardSummary {
        year,
        weeks_tracked: this_year.weeks_tracked,
        avg_weekly_income: this_year.avg_weekly_income,
        avg_weekly_savings: this_year.means.savings,
        total_savings: this_year.totals.savings,
        total_charity: this_year.totals.charity,
        total_leisure_development: this_year.totals.leisure_development,
        negative_balance_weeks: this_year.negative_balance_weeks,
        monthly_series: monthly_series(&sorted, year),
        category_shares: category_shares(&this_year.totals),
        income_delta_pct,
        savings_delta_pct,
        alerts: budget_alerts(&this_year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeeklyBudget;

    fn record(year: i32, week: u32, money_in: f64, savings: f64, expenses: f64) -> WeeklyRecord {
        WeeklyRecord {
            year,
            week,
            budget: WeeklyBudget {
                money_in,
                savings,
                daily_expenses: expenses,
                ..Default::default()
            },
            updated_at: None,
        }
    }

    #[test]
    fn aggregate_year_filters_and_sums() {
        let records = vec![
            record(2025, 1, 1000.0, 100.0, 300.0),
            record(2025, 2, 1200.0, 200.0, 400.0),
            record(2024, 50, 9999.0, 999.0, 0.0),
        ];
        let summary = aggregate_year(&records, 2025);
        assert_eq!(summary.weeks_tracked, 2);
        assert_eq!(summary.income_total, 2200.0);
        assert_eq!(summary.totals.savings, 300.0);
        assert_eq!(summary.avg_weekly_income, 1100.0);
        assert_eq!(summary.means.savings, 150.0);
    }

    #[test]
    fn aggregate_empty_year_has_zero_means() {
        let summary = aggregate_year(&[], 2025);
        assert_eq!(summary.weeks_tracked, 0);
        assert_eq!(summary.avg_weekly_income, 0.0);
        assert_eq!(summary.means.savings, 0.0);
    }

    #[test]
    fn negative_balance_weeks_counted() {
        let records = vec![
            record(2025, 1, 100.0, 0.0, 300.0),  // -200
            record(2025, 2, 500.0, 100.0, 200.0), // +200
            record(2025, 3, 50.0, 0.0, 60.0),    // -10
        ];
        let summary = aggregate_year(&records, 2025);
        assert_eq!(summary.negative_balance_weeks, 2);
    }

    #[test]
    fn alert_fires_above_threshold_only() {
        // 10 weeks tracked, 3 in the red -> alert
        let mut records: Vec<WeeklyRecord> = (1..=7)
            .map(|w| record(2025, w, 500.0, 100.0, 100.0))
            .collect();
        for w in 8..=10 {
            records.push(record(2025, w, 100.0, 0.0, 200.0));
        }
        let summary = aggregate_year(&records, 2025);
        assert_eq!(summary.negative_balance_weeks, 3);
        let alerts = budget_alerts(&summary);
        assert!(alerts.iter().any(|a| a.kind == AlertKind::NegativeBalance));

        // Exactly 2 in the red -> no alert
        let records: Vec<WeeklyRecord> = (1..=8)
            .map(|w| record(2025, w, 500.0, 100.0, 100.0))
            .chain((9..=10).map(|w| record(2025, w, 100.0, 0.0, 200.0)))
            .collect();
        let summary = aggregate_year(&records, 2025);
        assert_eq!(summary.negative_balance_weeks, 2);
        let alerts = budget_alerts(&summary);
        assert!(!alerts.iter().any(|a| a.kind == AlertKind::NegativeBalance));
    }

    #[test]
    fn low_savings_alert_requires_positive_savings() {
        // 5% savings rate -> alert
        let records = vec![record(2025, 1, 1000.0, 50.0, 0.0)];
        let summary = aggregate_year(&records, 2025);
        let alerts = budget_alerts(&summary);
        assert!(alerts.iter().any(|a| a.kind == AlertKind::LowSavingsRate));

        // Zero savings -> the tip would be noise, stay silent
        let records = vec![record(2025, 1, 1000.0, 0.0, 0.0)];
        let summary = aggregate_year(&records, 2025);
        let alerts = budget_alerts(&summary);
        assert!(!alerts.iter().any(|a| a.kind == AlertKind::LowSavingsRate));

        // Healthy 20% rate -> no alert
        let records = vec![record(2025, 1, 1000.0, 200.0, 0.0)];
        let summary = aggregate_year(&records, 2025);
        assert!(budget_alerts(&summary).is_empty());
    }

    #[test]
    fn year_over_year_delta_cases() {
        assert_eq!(year_over_year_delta(110.0, 100.0), Some(10.0));
        assert_eq!(year_over_year_delta(90.0, 100.0), Some(-10.0));
        assert_eq!(year_over_year_delta(500.0, 0.0), None);
    }

    #[test]
    fn monthly_series_merges_same_month() {
        // Weeks 1-4 all bucket into January, week 10 into March
        let records = vec![
            record(2025, 1, 100.0, 10.0, 0.0),
            record(2025, 2, 200.0, 20.0, 0.0),
            record(2025, 10, 400.0, 40.0, 0.0),
        ];
        let series = monthly_series(&records, 2025);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].month, "Jan");
        assert_eq!(series[0].income, 300.0);
        assert_eq!(series[0].savings, 30.0);
        assert_eq!(series[1].month, "Mar");
        assert_eq!(series[1].income, 400.0);
    }

    #[test]
    fn category_shares_exclude_zero_totals() {
        let totals = CategoryTotals {
            savings: 500.0,
            charity: 50.0,
            ..Default::default()
        };
        let shares = category_shares(&totals);
        assert_eq!(shares.len(), 2);
        assert!(shares.iter().all(|s| s.total > 0.0));
    }

    #[test]
    fn dashboard_summary_sorts_descending_input() {
        // Store order: newest first, like the repository returns
        let records = vec![
            record(2025, 3, 300.0, 30.0, 0.0),
            record(2025, 2, 200.0, 20.0, 0.0),
            record(2025, 1, 100.0, 10.0, 0.0),
            record(2024, 52, 1000.0, 100.0, 0.0),
        ];
        let summary = dashboard_summary(&records, 2025);
        assert_eq!(summary.weeks_tracked, 3);
        assert_eq!(summary.avg_weekly_income, 200.0);
        // Baseline year present -> deltas computed
        assert_eq!(summary.income_delta_pct, Some(-80.0));
        assert_eq!(summary.monthly_series.len(), 1);
        assert_eq!(summary.monthly_series[0].income, 600.0);
    }

    #[test]
    fn dashboard_summary_without_baseline_year() {
        let records = vec![record(2025, 1, 100.0, 10.0, 0.0)];
        let summary = dashboard_summary(&records, 2025);
        assert_eq!(summary.income_delta_pct, None);
        assert_eq!(summary.savings_delta_pct, None);
    }
}
