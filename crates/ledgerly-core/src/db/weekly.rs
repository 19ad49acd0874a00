//! Weekly budget record operations
//!
//! Weekly records are created implicitly on first save and merged on every
//! save after that: only the fields present in the patch are written, the
//! rest keep their stored values. Records are never deleted.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{WeeklyBudget, WeeklyPatch, WeeklyRecord};
use crate::period::WeekKey;

fn weekly_from_row(row: &Row) -> rusqlite::Result<WeeklyRecord> {
    Ok(WeeklyRecord {
        year: row.get("year")?,
        week: row.get("week")?,
        budget: WeeklyBudget {
            money_in: row.get("money_in")?,
            daily_expenses: row.get("daily_expenses")?,
            investments: row.get("investments")?,
            big_purchases: row.get("big_purchases")?,
            savings: row.get("savings")?,
            leisure_development: row.get("leisure_development")?,
            charity: row.get("charity")?,
            notes: row.get("notes")?,
            month: row.get("month")?,
        },
        updated_at: row
            .get::<_, Option<String>>("updated_at")?
            .map(|s| parse_datetime(&s)),
    })
}

const WEEKLY_COLUMNS: &str = "year, week, money_in, daily_expenses, investments, big_purchases, \
     savings, leisure_development, charity, notes, month, updated_at";

impl Database {
    /// Load one weekly record, or None when the period has no record yet
    pub fn get_weekly(&self, user_id: i64, key: WeekKey) -> Result<Option<WeeklyRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {} FROM weekly_budgets WHERE user_id = ? AND period_key = ?",
                    WEEKLY_COLUMNS
                ),
                params![user_id, key.doc_id()],
                |row| weekly_from_row(row),
            )
            .optional()?;
        Ok(record)
    }

    /// Merge-save a weekly record and return the stored result.
    ///
    /// Creates the record on first save; afterwards, fields absent from the
    /// patch keep their stored values. The read and write share one
    /// connection, and the upsert keys on the same `doc_id` the read used.
    pub fn save_weekly(
        &self,
        user_id: i64,
        key: WeekKey,
        patch: &WeeklyPatch,
    ) -> Result<WeeklyRecord> {
        let conn = self.conn()?;
        let doc_id = key.doc_id();

        let existing: Option<WeeklyBudget> = conn
            .query_row(
                &format!(
                    "SELECT {} FROM weekly_budgets WHERE user_id = ? AND period_key = ?",
                    WEEKLY_COLUMNS
                ),
                params![user_id, &doc_id],
                |row| weekly_from_row(row),
            )
            .optional()?
            .map(|r| r.budget);

        let merged = patch.apply(&existing.unwrap_or_default());

        conn.execute(
            r#"
            INSERT INTO weekly_budgets (
                user_id, period_key, year, week,
                money_in, daily_expenses, investments, big_purchases,
                savings, leisure_development, charity, notes, month, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(user_id, period_key) DO UPDATE SET
                money_in = excluded.money_in,
                daily_expenses = excluded.daily_expenses,
                investments = excluded.investments,
                big_purchases = excluded.big_purchases,
                savings = excluded.savings,
                leisure_development = excluded.leisure_development,
                charity = excluded.charity,
                notes = excluded.notes,
                month = excluded.month,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![
                user_id,
                &doc_id,
                key.year,
                key.week,
                merged.money_in,
                merged.daily_expenses,
                merged.investments,
                merged.big_purchases,
                merged.savings,
                merged.leisure_development,
                merged.charity,
                merged.notes,
                merged.month,
            ],
        )?;

        conn.query_row(
            &format!(
                "SELECT {} FROM weekly_budgets WHERE user_id = ? AND period_key = ?",
                WEEKLY_COLUMNS
            ),
            params![user_id, &doc_id],
            |row| weekly_from_row(row),
        )
        .map_err(Into::into)
    }

    /// Most-recent weekly records, newest first (year desc, week desc)
    pub fn list_recent_weekly(&self, user_id: i64, limit: i64) -> Result<Vec<WeeklyRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM weekly_budgets WHERE user_id = ?
             ORDER BY year DESC, week DESC LIMIT ?",
            WEEKLY_COLUMNS
        ))?;
        let records = stmt
            .query_map(params![user_id, limit], |row| weekly_from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Number of weekly records stored for a user
    pub fn count_weekly(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM weekly_budgets WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?)
    }
}
