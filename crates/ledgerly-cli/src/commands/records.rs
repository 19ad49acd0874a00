//! Weekly and monthly record command implementations

use anyhow::Result;
use chrono::Local;
use ledgerly_core::db::Database;
use ledgerly_core::models::{MonthlyBudget, WeeklyBudget, WeeklyPatch};
use ledgerly_core::period::{MonthKey, WeekKey};

use super::resolve_user;

/// Resolve a week key from optional arguments, defaulting to the current week
pub fn weekly_key(year: Option<i32>, week: Option<u32>) -> Result<WeekKey> {
    let current = WeekKey::for_date(Local::now().date_naive());
    Ok(WeekKey::new(
        year.unwrap_or(current.year),
        week.unwrap_or(current.week),
    )?)
}

/// Resolve a month key from optional arguments, defaulting to the current month
pub fn monthly_key(year: Option<i32>, month: Option<u32>) -> Result<MonthKey> {
    let current = MonthKey::for_date(Local::now().date_naive());
    Ok(MonthKey::new(
        year.unwrap_or(current.year),
        month.unwrap_or(current.month),
    )?)
}

fn print_weekly(key: WeekKey, budget: &WeeklyBudget) {
    println!();
    println!("📅 Week {} ({})", key, key.doc_id());
    if !budget.month.is_empty() {
        println!("   Month: {}", budget.month);
    }
    println!("   ─────────────────────────────");
    println!("   Money in:              {:>10.2}", budget.money_in);
    println!("   Daily expenses:        {:>10.2}", budget.daily_expenses);
    println!("   Investments:           {:>10.2}", budget.investments);
    println!("   Big purchases:         {:>10.2}", budget.big_purchases);
    println!("   Savings:               {:>10.2}", budget.savings);
    println!(
        "   Leisure & development: {:>10.2}",
        budget.leisure_development
    );
    println!("   Charity:               {:>10.2}", budget.charity);
    println!("   ─────────────────────────────");
    println!("   Total out:             {:>10.2}", budget.total_out());
    let balance = budget.balance();
    if balance < 0.0 {
        println!("   ⚠️  Balance:            {:>10.2}", balance);
    } else {
        println!("   Balance:               {:>10.2}", balance);
    }
    if !budget.notes.is_empty() {
        println!();
        println!("   Notes: {}", budget.notes);
    }
    println!();
}

pub fn cmd_weekly_show(
    db: &Database,
    email: &str,
    year: Option<i32>,
    week: Option<u32>,
) -> Result<()> {
    let user = resolve_user(db, email)?;
    let key = weekly_key(year, week)?;

    // An unsaved week reads as all zeros
    let budget = db
        .get_weekly(user.id, key)?
        .map(|r| r.budget)
        .unwrap_or_default();
    print_weekly(key, &budget);

    Ok(())
}

pub fn cmd_weekly_set(
    db: &Database,
    email: &str,
    year: Option<i32>,
    week: Option<u32>,
    patch: WeeklyPatch,
) -> Result<()> {
    let user = resolve_user(db, email)?;
    let key = weekly_key(year, week)?;

    let record = db.save_weekly(user.id, key, &patch)?;
    println!("✅ Saved {}", key.doc_id());
    print_weekly(key, &record.budget);

    Ok(())
}

fn print_monthly(key: MonthKey, budget: &MonthlyBudget) {
    println!();
    println!("🗓  Month {} ({})", key, key.doc_id());
    println!("   ─────────────────────────────");
    println!("   Planned income:      {:>10.2}", budget.planned_income);
    println!("   Planned expenses:    {:>10.2}", budget.planned_expenses);
    println!(
        "   Planned investments: {:>10.2}",
        budget.planned_investments
    );
    println!("   Planned savings:     {:>10.2}", budget.planned_savings);
    println!("   ─────────────────────────────");
    let balance = budget.planned_balance();
    if balance < 0.0 {
        println!("   ⚠️  Planned balance:  {:>10.2}", balance);
    } else {
        println!("   Planned balance:     {:>10.2}", balance);
    }
    if !budget.notes.is_empty() {
        println!();
        println!("   Notes: {}", budget.notes);
    }
    println!();
}

pub fn cmd_monthly_show(
    db: &Database,
    email: &str,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let user = resolve_user(db, email)?;
    let key = monthly_key(year, month)?;

    let budget = db.get_monthly(user.id, key)?.unwrap_or_default();
    print_monthly(key, &budget);

    Ok(())
}

pub fn cmd_monthly_set(
    db: &Database,
    email: &str,
    year: Option<i32>,
    month: Option<u32>,
    budget: MonthlyBudget,
) -> Result<()> {
    let user = resolve_user(db, email)?;
    let key = monthly_key(year, month)?;

    // Full replace: whatever was stored before is overwritten
    db.save_monthly(user.id, key, &budget)?;
    println!("✅ Saved {}", key.doc_id());
    print_monthly(key, &budget);

    Ok(())
}
