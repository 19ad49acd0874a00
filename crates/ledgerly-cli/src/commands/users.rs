//! User account command implementations

use anyhow::{Context, Result};
use ledgerly_core::auth;
use ledgerly_core::db::Database;

pub fn cmd_user_add(db: &Database, email: &str, password: &str) -> Result<()> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        anyhow::bail!("Invalid email address: {}", email);
    }
    if password.len() < 6 {
        anyhow::bail!("Password must be at least 6 characters");
    }

    let hash = auth::hash_password(password).context("Failed to hash password")?;
    let id = db
        .create_user(&email, &hash)
        .context("Failed to create user")?;

    println!("✅ Created account {} (id {})", email, id);
    Ok(())
}

pub fn cmd_user_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No accounts found. Create one with:");
        println!("  ledgerly user add --email you@example.com --password ...");
        return Ok(());
    }

    println!();
    println!("👤 Accounts");
    println!("   ─────────────────────────────");

    for user in users {
        println!(
            "   [{}] {} (since {})",
            user.id,
            user.email,
            user.created_at.format("%Y-%m-%d")
        );
    }
    println!();

    Ok(())
}
