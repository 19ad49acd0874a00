//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth;
    use crate::period::{MonthKey, WeekKey};

    fn test_user(db: &Database) -> i64 {
        let hash = auth::hash_password("secret-pass").unwrap();
        db.create_user("me@example.com", &hash).unwrap()
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let users = db.list_users().unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn test_path_and_encryption_status() {
        let db = Database::in_memory().unwrap();
        assert!(db.path().starts_with("/tmp/ledgerly_test_"));

        // Test databases are keyless, so encryption tracks the key env var
        let has_key = std::env::var(DB_KEY_ENV).is_ok();
        assert_eq!(db.is_encrypted().unwrap(), has_key);
    }

    #[test]
    fn test_user_crud() {
        let db = Database::in_memory().unwrap();

        let id = test_user(&db);
        assert!(id > 0);

        let user = db.get_user(id).unwrap();
        assert_eq!(user.email, "me@example.com");

        // Duplicate email is rejected
        let result = db.create_user("me@example.com", "some-hash");
        assert!(result.is_err());

        let (found, hash) = db
            .get_user_with_password("me@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, id);
        assert!(auth::verify_password("secret-pass", &hash).unwrap());
    }

    #[test]
    fn test_session_lifecycle() {
        let db = Database::in_memory().unwrap();
        let user_id = test_user(&db);

        let token = auth::generate_token();
        let digest = auth::token_digest(&token);
        db.create_session(user_id, &digest).unwrap();

        // Valid digest resolves to the user
        let user = db.session_user(&digest).unwrap().unwrap();
        assert_eq!(user.id, user_id);

        // Unknown digest resolves to nothing
        assert!(db.session_user("bogus").unwrap().is_none());

        // Deleting ends the session
        assert!(db.delete_session(&digest).unwrap());
        assert!(db.session_user(&digest).unwrap().is_none());
        assert!(!db.delete_session(&digest).unwrap());
    }

    #[test]
    fn test_expired_sessions_are_invalid() {
        let db = Database::in_memory().unwrap();
        let user_id = test_user(&db);

        let digest = auth::token_digest(&auth::generate_token());
        db.create_session(user_id, &digest).unwrap();

        // Force the session into the past
        let conn = db.conn().unwrap();
        conn.execute(
            "UPDATE sessions SET expires_at = datetime('now', '-1 day')",
            [],
        )
        .unwrap();

        assert!(db.session_user(&digest).unwrap().is_none());
        assert_eq!(db.purge_expired_sessions().unwrap(), 1);
    }

    #[test]
    fn test_weekly_save_and_load_roundtrip() {
        let db = Database::in_memory().unwrap();
        let user_id = test_user(&db);
        let key = WeekKey::new(2025, 7).unwrap();

        // Missing record reads as None
        assert!(db.get_weekly(user_id, key).unwrap().is_none());

        let budget = WeeklyBudget {
            money_in: 1000.0,
            daily_expenses: 200.0,
            savings: 300.0,
            notes: "normal week".to_string(),
            month: "February".to_string(),
            ..Default::default()
        };
        db.save_weekly(user_id, key, &WeeklyPatch::from_budget(&budget))
            .unwrap();

        let loaded = db.get_weekly(user_id, key).unwrap().unwrap();
        assert_eq!(loaded.budget, budget);
        assert_eq!(loaded.year, 2025);
        assert_eq!(loaded.week, 7);
        assert!(loaded.updated_at.is_some());
    }

    #[test]
    fn test_weekly_merge_preserves_omitted_fields() {
        let db = Database::in_memory().unwrap();
        let user_id = test_user(&db);
        let key = WeekKey::new(2025, 7).unwrap();

        let initial = WeeklyBudget {
            money_in: 1000.0,
            savings: 300.0,
            notes: "first save".to_string(),
            ..Default::default()
        };
        db.save_weekly(user_id, key, &WeeklyPatch::from_budget(&initial))
            .unwrap();

        // Second save touches only savings
        let patch = WeeklyPatch {
            savings: Some(450.0),
            ..Default::default()
        };
        let merged = db.save_weekly(user_id, key, &patch).unwrap();

        assert_eq!(merged.budget.savings, 450.0);
        assert_eq!(merged.budget.money_in, 1000.0);
        assert_eq!(merged.budget.notes, "first save");
    }

    #[test]
    fn test_weekly_records_are_per_user() {
        let db = Database::in_memory().unwrap();
        let alice = test_user(&db);
        let hash = auth::hash_password("pw").unwrap();
        let bob = db.create_user("bob@example.com", &hash).unwrap();
        let key = WeekKey::new(2025, 1).unwrap();

        let budget = WeeklyBudget {
            money_in: 500.0,
            ..Default::default()
        };
        db.save_weekly(alice, key, &WeeklyPatch::from_budget(&budget))
            .unwrap();

        assert!(db.get_weekly(bob, key).unwrap().is_none());
        assert_eq!(db.count_weekly(alice).unwrap(), 1);
        assert_eq!(db.count_weekly(bob).unwrap(), 0);
    }

    #[test]
    fn test_list_recent_weekly_newest_first() {
        let db = Database::in_memory().unwrap();
        let user_id = test_user(&db);

        for (year, week) in [(2024, 50), (2025, 2), (2024, 52), (2025, 1)] {
            let key = WeekKey::new(year, week).unwrap();
            let budget = WeeklyBudget {
                money_in: week as f64,
                ..Default::default()
            };
            db.save_weekly(user_id, key, &WeeklyPatch::from_budget(&budget))
                .unwrap();
        }

        let records = db.list_recent_weekly(user_id, 104).unwrap();
        let keys: Vec<(i32, u32)> = records.iter().map(|r| (r.year, r.week)).collect();
        assert_eq!(keys, vec![(2025, 2), (2025, 1), (2024, 52), (2024, 50)]);

        // Limit applies
        let records = db.list_recent_weekly(user_id, 2).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_monthly_save_is_full_replace() {
        let db = Database::in_memory().unwrap();
        let user_id = test_user(&db);
        let key = MonthKey::new(2025, 3).unwrap();

        assert!(db.get_monthly(user_id, key).unwrap().is_none());

        let first = MonthlyBudget {
            planned_income: 4000.0,
            planned_savings: 800.0,
            notes: "march plan".to_string(),
            ..Default::default()
        };
        db.save_monthly(user_id, key, &first).unwrap();

        // Replacing with a record that omits notes wipes them
        let second = MonthlyBudget {
            planned_income: 4200.0,
            ..Default::default()
        };
        db.save_monthly(user_id, key, &second).unwrap();

        let loaded = db.get_monthly(user_id, key).unwrap().unwrap();
        assert_eq!(loaded, second);
        assert_eq!(loaded.planned_savings, 0.0);
        assert_eq!(loaded.notes, "");
        assert_eq!(db.count_monthly(user_id).unwrap(), 1);
    }

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();
        db.log_audit(
            "me@example.com",
            "save",
            Some("weekly_budget"),
            Some("2025_W07"),
            None,
        )
        .unwrap();
        assert_eq!(db.count_audit_entries().unwrap(), 1);
    }
}
