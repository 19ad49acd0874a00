//! Integration tests for ledgerly-core
//!
//! These tests exercise the full save → load → aggregate → alert workflow.

use chrono::NaiveDate;

use ledgerly_core::{
    aggregate::dashboard_summary,
    auth,
    db::Database,
    models::{AlertKind, WeeklyBudget, WeeklyPatch},
    period::{MonthKey, WeekKey},
};

fn signed_up_user(db: &Database, email: &str) -> i64 {
    let hash = auth::hash_password("test-password").unwrap();
    db.create_user(email, &hash).unwrap()
}

/// Seed a year of weekly records with a fixed income and savings per week
fn seed_weeks(db: &Database, user_id: i64, year: i32, weeks: u32, income: f64, savings: f64) {
    for week in 1..=weeks {
        let key = WeekKey::new(year, week).unwrap();
        let budget = WeeklyBudget {
            money_in: income,
            daily_expenses: income * 0.5,
            savings,
            ..Default::default()
        };
        db.save_weekly(user_id, key, &WeeklyPatch::from_budget(&budget))
            .unwrap();
    }
}

// =============================================================================
// Record workflow
// =============================================================================

#[test]
fn test_full_weekly_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let user_id = signed_up_user(&db, "workflow@example.com");

    // Key derived from a real date lands in the right period
    let date = NaiveDate::from_ymd_opt(2025, 2, 12).unwrap();
    let key = WeekKey::for_date(date);
    assert_eq!(key.doc_id(), "2025_W07");

    // First save creates the record
    let budget = WeeklyBudget {
        money_in: 1200.0,
        daily_expenses: 400.0,
        savings: 300.0,
        month: "February".to_string(),
        ..Default::default()
    };
    let saved = db
        .save_weekly(user_id, key, &WeeklyPatch::from_budget(&budget))
        .unwrap();
    assert_eq!(saved.budget.balance(), 500.0);

    // Partial save merges over the stored record
    let patch = WeeklyPatch {
        charity: Some(50.0),
        notes: Some("donated".to_string()),
        ..Default::default()
    };
    let merged = db.save_weekly(user_id, key, &patch).unwrap();
    assert_eq!(merged.budget.money_in, 1200.0);
    assert_eq!(merged.budget.charity, 50.0);
    assert_eq!(merged.budget.balance(), 450.0);

    // Navigation from this period reaches adjacent weeks
    assert_eq!(key.prev().doc_id(), "2025_W06");
    assert_eq!(key.next().doc_id(), "2025_W08");
}

#[test]
fn test_monthly_plan_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let user_id = signed_up_user(&db, "planner@example.com");

    let key = MonthKey::for_date(NaiveDate::from_ymd_opt(2025, 2, 12).unwrap());
    assert_eq!(key.doc_id(), "2025_02");

    let plan = ledgerly_core::models::MonthlyBudget {
        planned_income: 5000.0,
        planned_expenses: 3000.0,
        planned_investments: 500.0,
        planned_savings: 1000.0,
        notes: "tight month".to_string(),
    };
    db.save_monthly(user_id, key, &plan).unwrap();

    let loaded = db.get_monthly(user_id, key).unwrap().unwrap();
    assert_eq!(loaded.planned_balance(), 500.0);
    assert_eq!(loaded, plan);

    // January navigation wraps into the previous year
    let jan = MonthKey::new(2025, 1).unwrap();
    assert_eq!(jan.prev().doc_id(), "2024_12");
}

#[test]
fn test_database_persists_across_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("ledgerly.db");
    let path_str = path.to_str().unwrap();

    let key = WeekKey::new(2025, 1).unwrap();
    {
        let db = Database::new_unencrypted(path_str).unwrap();
        let user_id = signed_up_user(&db, "persist@example.com");
        let budget = WeeklyBudget {
            money_in: 777.0,
            ..Default::default()
        };
        db.save_weekly(user_id, key, &WeeklyPatch::from_budget(&budget))
            .unwrap();
    }

    let db = Database::new_unencrypted(path_str).unwrap();
    let (user, _) = db
        .get_user_with_password("persist@example.com")
        .unwrap()
        .unwrap();
    let record = db.get_weekly(user.id, key).unwrap().unwrap();
    assert_eq!(record.budget.money_in, 777.0);
}

#[test]
fn test_encrypted_database_requires_its_passphrase() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("encrypted.db");
    let path_str = path.to_str().unwrap();

    {
        let db = Database::new_with_key(path_str, Some("correct horse")).unwrap();
        signed_up_user(&db, "secret@example.com");
    }

    // Same passphrase opens the database again
    let db = Database::new_with_key(path_str, Some("correct horse")).unwrap();
    assert!(db
        .get_user_with_password("secret@example.com")
        .unwrap()
        .is_some());

    // A different passphrase cannot read it
    assert!(Database::new_with_key(path_str, Some("wrong battery staple")).is_err());
}

// =============================================================================
// Dashboard workflow
// =============================================================================

#[test]
fn test_dashboard_from_stored_records() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let user_id = signed_up_user(&db, "dash@example.com");

    seed_weeks(&db, user_id, 2024, 10, 1000.0, 200.0);
    seed_weeks(&db, user_id, 2025, 8, 1100.0, 220.0);

    let records = db.list_recent_weekly(user_id, 104).unwrap();
    assert_eq!(records.len(), 18);

    let summary = dashboard_summary(&records, 2025);
    assert_eq!(summary.weeks_tracked, 8);
    assert_eq!(summary.avg_weekly_income, 1100.0);
    assert_eq!(summary.avg_weekly_savings, 220.0);

    // Both deltas compare against the full 2024 baseline
    let income_delta = summary.income_delta_pct.unwrap();
    assert!((income_delta - 10.0).abs() < 1e-9);
    let savings_delta = summary.savings_delta_pct.unwrap();
    assert!((savings_delta - 10.0).abs() < 1e-9);

    // Savings rate is 20%, well above the alert threshold
    assert!(summary.alerts.is_empty());
}

#[test]
fn test_dashboard_alerts_fire_on_bad_year() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let user_id = signed_up_user(&db, "alerts@example.com");

    // 6 weeks where spending exceeds income, 4 healthy weeks with thin savings
    for week in 1..=6u32 {
        let key = WeekKey::new(2025, week).unwrap();
        let budget = WeeklyBudget {
            money_in: 500.0,
            daily_expenses: 700.0,
            savings: 10.0,
            ..Default::default()
        };
        db.save_weekly(user_id, key, &WeeklyPatch::from_budget(&budget))
            .unwrap();
    }
    for week in 7..=10u32 {
        let key = WeekKey::new(2025, week).unwrap();
        let budget = WeeklyBudget {
            money_in: 500.0,
            daily_expenses: 400.0,
            savings: 10.0,
            ..Default::default()
        };
        db.save_weekly(user_id, key, &WeeklyPatch::from_budget(&budget))
            .unwrap();
    }

    let records = db.list_recent_weekly(user_id, 104).unwrap();
    let summary = dashboard_summary(&records, 2025);

    assert_eq!(summary.negative_balance_weeks, 6);
    let kinds: Vec<AlertKind> = summary.alerts.iter().map(|a| a.kind).collect();
    assert!(kinds.contains(&AlertKind::NegativeBalance));
    assert!(kinds.contains(&AlertKind::LowSavingsRate));
}

#[test]
fn test_dashboard_first_year_has_no_deltas() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let user_id = signed_up_user(&db, "firstyear@example.com");

    seed_weeks(&db, user_id, 2025, 4, 900.0, 150.0);

    let records = db.list_recent_weekly(user_id, 104).unwrap();
    let summary = dashboard_summary(&records, 2025);

    assert!(summary.income_delta_pct.is_none());
    assert!(summary.savings_delta_pct.is_none());
}

// =============================================================================
// Session workflow
// =============================================================================

#[tokio::test]
async fn test_session_sign_in_flow_with_events() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let events = ledgerly_core::auth::SessionEvents::new();
    let mut sub = events.subscribe();

    // Sign up
    let hash = auth::hash_password("hunter2!").unwrap();
    let user_id = db.create_user("events@example.com", &hash).unwrap();

    // Sign in: verify password, mint a token, store its digest
    let (user, stored_hash) = db
        .get_user_with_password("events@example.com")
        .unwrap()
        .unwrap();
    assert!(auth::verify_password("hunter2!", &stored_hash).unwrap());
    assert!(!auth::verify_password("wrong", &stored_hash).unwrap());

    let token = auth::generate_token();
    let digest = auth::token_digest(&token);
    db.create_session(user_id, &digest).unwrap();
    events.publish(ledgerly_core::auth::SessionEvent::SignedIn {
        user_id,
        email: user.email.clone(),
    });

    match sub.next().await {
        Some(ledgerly_core::auth::SessionEvent::SignedIn { user_id: id, .. }) => {
            assert_eq!(id, user_id)
        }
        other => panic!("unexpected event: {:?}", other),
    }

    // The raw token never hits the database, only its digest does
    assert!(db.session_user(&token).unwrap().is_none());
    let resolved = db.session_user(&digest).unwrap().unwrap();
    assert_eq!(resolved.id, user_id);

    // Sign out
    assert!(db.delete_session(&digest).unwrap());
    assert!(db.session_user(&digest).unwrap().is_none());
}
