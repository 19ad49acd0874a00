//! Ledgerly Core Library
//!
//! Shared functionality for the Ledgerly budget tracker:
//! - Database access and migrations
//! - ISO week / period key math and period navigation
//! - Budget aggregation (yearly summaries, monthly series, advisory alerts)
//! - Typed budget records with lenient numeric coercion
//! - User accounts, password hashing, and session management
//! - Session event subscriptions with cancellation handles

pub mod aggregate;
pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod period;

pub use aggregate::{
    aggregate_year, budget_alerts, dashboard_summary, monthly_series, year_over_year_delta,
};
pub use auth::{SessionEvent, SessionEvents, SessionSubscription};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{
    BudgetAlert, DashboardSummary, MonthlyBudget, MonthlyPoint, WeeklyBudget, WeeklyPatch,
    WeeklyRecord, YearSummary,
};
pub use period::{MonthKey, WeekKey};
