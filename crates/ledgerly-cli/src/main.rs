//! Ledgerly CLI - Weekly and monthly budget tracker
//!
//! Usage:
//!   ledgerly init                 Initialize database
//!   ledgerly user add ...         Create an account
//!   ledgerly weekly set ...       Record a week's budget
//!   ledgerly serve --port 3000    Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use ledgerly_core::models::{MonthlyBudget, WeeklyPatch};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Dashboard { email, year, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_dashboard(&db, &email, year, json)
        }
        Commands::User { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                UserAction::Add { email, password } => {
                    commands::cmd_user_add(&db, &email, &password)
                }
                UserAction::List => commands::cmd_user_list(&db),
            }
        }
        Commands::Weekly { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                WeeklyAction::Show { email, year, week } => {
                    commands::cmd_weekly_show(&db, &email, year, week)
                }
                WeeklyAction::Set {
                    email,
                    year,
                    week,
                    money_in,
                    daily_expenses,
                    investments,
                    big_purchases,
                    savings,
                    leisure_development,
                    charity,
                    notes,
                    month,
                } => {
                    let patch = WeeklyPatch {
                        money_in,
                        daily_expenses,
                        investments,
                        big_purchases,
                        savings,
                        leisure_development,
                        charity,
                        notes,
                        month,
                    };
                    commands::cmd_weekly_set(&db, &email, year, week, patch)
                }
            }
        }
        Commands::Monthly { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                MonthlyAction::Show { email, year, month } => {
                    commands::cmd_monthly_show(&db, &email, year, month)
                }
                MonthlyAction::Set {
                    email,
                    year,
                    month,
                    planned_income,
                    planned_expenses,
                    planned_investments,
                    planned_savings,
                    notes,
                } => {
                    let budget = MonthlyBudget {
                        planned_income,
                        planned_expenses,
                        planned_investments,
                        planned_savings,
                        notes,
                    };
                    commands::cmd_monthly_set(&db, &email, year, month, budget)
                }
            }
        }
    }
}
