//! Status and dashboard command implementations

use std::path::Path;

use anyhow::Result;
use chrono::{Datelike, Utc};
use ledgerly_core::aggregate::dashboard_summary;
use ledgerly_core::db::Database;

use super::{open_db, resolve_user};

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use ledgerly_core::db::DB_KEY_ENV;
    use std::fs;

    println!();
    println!("📊 Ledgerly Status");
    println!("   ─────────────────────────────────────────────────────────────");

    // Database path
    println!("   Database: {}", db_path.display());

    // Check if database file exists and get size
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    let has_key = std::env::var(DB_KEY_ENV).is_ok();

    // Open the database to report its actual encryption state and stats.
    // When it can't be opened (or doesn't exist yet), fall back to what
    // the flags and environment imply.
    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                if no_encrypt {
                    println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
                } else if db.is_encrypted().unwrap_or(false) {
                    println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
                } else {
                    println!("   ⚠️  Encryption: DISABLED");
                }
                print_record_counts(&db);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not open database for status");
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                } else if has_key {
                    println!("      (Check if {} is correct)", DB_KEY_ENV);
                }
            }
        }
    } else if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    println!();
    Ok(())
}

fn print_record_counts(db: &Database) {
    let Ok(users) = db.list_users() else { return };

    println!();
    println!("   Accounts: {}", users.len());
    for user in users {
        let weekly = db.count_weekly(user.id).unwrap_or(0);
        let monthly = db.count_monthly(user.id).unwrap_or(0);
        println!(
            "     {} - {} weekly, {} monthly record(s)",
            user.email, weekly, monthly
        );
    }
    if let Ok(audit) = db.count_audit_entries() {
        println!("   Audit entries: {}", audit);
    }
}

pub fn cmd_dashboard(db: &Database, email: &str, year: Option<i32>, json: bool) -> Result<()> {
    let user = resolve_user(db, email)?;
    let year = year.unwrap_or_else(|| Utc::now().year());

    let records = db.list_recent_weekly(user.id, 104)?;
    let summary = dashboard_summary(&records, year);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│          💰 Ledgerly Dashboard          │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Year:                {}", summary.year);
    println!("  Weeks tracked:       {}", summary.weeks_tracked);
    println!("  Avg weekly income:   {:.2}", summary.avg_weekly_income);
    println!("  Avg weekly savings:  {:.2}", summary.avg_weekly_savings);
    println!("  Total savings:       {:.2}", summary.total_savings);
    println!("  Total charity:       {:.2}", summary.total_charity);
    println!(
        "  Leisure & dev:       {:.2}",
        summary.total_leisure_development
    );

    // "New" when there is no prior-year baseline
    match summary.income_delta_pct {
        Some(delta) => println!("  Income vs last year: {:+.1}%", delta),
        None => println!("  Income vs last year: New"),
    }
    match summary.savings_delta_pct {
        Some(delta) => println!("  Savings vs last year: {:+.1}%", delta),
        None => println!("  Savings vs last year: New"),
    }

    if !summary.monthly_series.is_empty() {
        println!();
        println!("  📈 Monthly income / savings");
        for point in &summary.monthly_series {
            println!(
                "     {:<4} {:>10.2} / {:>10.2}",
                point.month, point.income, point.savings
            );
        }
    }

    if summary.alerts.is_empty() {
        println!();
        println!("  ✅ No budget alerts.");
    } else {
        println!();
        println!("  ⚠️  Alerts:");
        for alert in &summary.alerts {
            println!("     - [{}] {}", alert.kind, alert.message);
        }
    }
    println!();

    Ok(())
}
