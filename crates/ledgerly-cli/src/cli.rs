//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ledgerly - Weekly and monthly budget tracking
#[derive(Parser)]
#[command(name = "ledgerly")]
#[command(about = "Self-hosted weekly/monthly budget tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "ledgerly.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set LEDGERLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires a signed-in session for every request.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show database status (encryption, size, record counts)
    Status,

    /// Show the yearly dashboard summary for a user
    Dashboard {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Year to summarize (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Emit the summary as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show or update weekly budget records
    Weekly {
        #[command(subcommand)]
        action: WeeklyAction,
    },

    /// Show or update monthly budget plans
    Monthly {
        #[command(subcommand)]
        action: MonthlyAction,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user account
    Add {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// List all user accounts
    List,
}

#[derive(Subcommand)]
pub enum WeeklyAction {
    /// Show one weekly record (defaults to the current week)
    Show {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Year of the record
        #[arg(short, long)]
        year: Option<i32>,

        /// ISO week number (1-53)
        #[arg(short, long)]
        week: Option<u32>,
    },

    /// Update fields of a weekly record (merge save)
    Set {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Year of the record
        #[arg(short, long)]
        year: Option<i32>,

        /// ISO week number (1-53)
        #[arg(short, long)]
        week: Option<u32>,

        /// Money in for the week
        #[arg(long)]
        money_in: Option<f64>,

        /// Daily expenses
        #[arg(long)]
        daily_expenses: Option<f64>,

        /// Investments
        #[arg(long)]
        investments: Option<f64>,

        /// Big purchases
        #[arg(long)]
        big_purchases: Option<f64>,

        /// Savings
        #[arg(long)]
        savings: Option<f64>,

        /// Leisure and development
        #[arg(long)]
        leisure_development: Option<f64>,

        /// Charity
        #[arg(long)]
        charity: Option<f64>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Month label for this week (display only)
        #[arg(long)]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum MonthlyAction {
    /// Show one monthly plan (defaults to the current month)
    Show {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Year of the plan
        #[arg(short, long)]
        year: Option<i32>,

        /// Month number (1-12)
        #[arg(short, long)]
        month: Option<u32>,
    },

    /// Save a monthly plan (full replace)
    Set {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Year of the plan
        #[arg(short, long)]
        year: Option<i32>,

        /// Month number (1-12)
        #[arg(short, long)]
        month: Option<u32>,

        /// Planned income
        #[arg(long, default_value = "0")]
        planned_income: f64,

        /// Planned expenses
        #[arg(long, default_value = "0")]
        planned_expenses: f64,

        /// Planned investments
        #[arg(long, default_value = "0")]
        planned_investments: f64,

        /// Planned savings
        #[arg(long, default_value = "0")]
        planned_savings: f64,

        /// Free-form notes
        #[arg(long, default_value = "")]
        notes: String,
    },
}
