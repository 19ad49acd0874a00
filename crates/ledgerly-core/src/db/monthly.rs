//! Monthly budget record operations
//!
//! Monthly saves replace the whole record - no merge semantics, matching
//! the planning workflow where the form always submits every field.

use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::error::Result;
use crate::models::MonthlyBudget;
use crate::period::MonthKey;

fn monthly_from_row(row: &Row) -> rusqlite::Result<MonthlyBudget> {
    Ok(MonthlyBudget {
        planned_income: row.get("planned_income")?,
        planned_expenses: row.get("planned_expenses")?,
        planned_investments: row.get("planned_investments")?,
        planned_savings: row.get("planned_savings")?,
        notes: row.get("notes")?,
    })
}

impl Database {
    /// Load one monthly record, or None when the period has no record yet
    pub fn get_monthly(&self, user_id: i64, key: MonthKey) -> Result<Option<MonthlyBudget>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                "SELECT planned_income, planned_expenses, planned_investments,
                        planned_savings, notes
                 FROM monthly_budgets WHERE user_id = ? AND period_key = ?",
                params![user_id, key.doc_id()],
                |row| monthly_from_row(row),
            )
            .optional()?;
        Ok(record)
    }

    /// Full-replace save of a monthly record
    pub fn save_monthly(&self, user_id: i64, key: MonthKey, budget: &MonthlyBudget) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO monthly_budgets (
                user_id, period_key, year, month,
                planned_income, planned_expenses, planned_investments,
                planned_savings, notes, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(user_id, period_key) DO UPDATE SET
                planned_income = excluded.planned_income,
                planned_expenses = excluded.planned_expenses,
                planned_investments = excluded.planned_investments,
                planned_savings = excluded.planned_savings,
                notes = excluded.notes,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![
                user_id,
                key.doc_id(),
                key.year,
                key.month,
                budget.planned_income,
                budget.planned_expenses,
                budget.planned_investments,
                budget.planned_savings,
                budget.notes,
            ],
        )?;
        Ok(())
    }

    /// Number of monthly records stored for a user
    pub fn count_monthly(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM monthly_budgets WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?)
    }
}
