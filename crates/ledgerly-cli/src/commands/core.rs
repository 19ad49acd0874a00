//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `resolve_user` - Look up an account by email

use std::path::Path;

use anyhow::{Context, Result};
use ledgerly_core::db::Database;
use ledgerly_core::models::User;
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    debug!(path = %db_path.display(), encrypted = !no_encrypt, "Opening database");
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Look up an account by email, with a helpful error when it doesn't exist
pub fn resolve_user(db: &Database, email: &str) -> Result<User> {
    debug!(email = %email, "Resolving account");
    let found = db
        .get_user_with_password(&email.trim().to_lowercase())
        .context("Failed to look up user")?;
    match found {
        Some((user, _)) => Ok(user),
        None => anyhow::bail!(
            "No account for {}. Create one with: ledgerly user add --email {} --password ...",
            email,
            email
        ),
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let _db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create an account: ledgerly user add --email you@example.com --password ...");
    println!("  2. Start web UI: ledgerly serve");

    Ok(())
}
